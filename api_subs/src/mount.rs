use crate::routes;
use actix_web::web::{self};

pub fn mount_pay() -> actix_web::Scope {
    web::scope("/pay").service(routes::pay::post_checkout)
}
pub fn mount_webhook() -> actix_web::Scope {
    web::scope("/pay")
        .service(routes::pay::post_webhook)
        .service(routes::pay::post_verify)
}
pub fn mount_subs() -> actix_web::Scope {
    web::scope("/sub").service(routes::sub::get_plans)
}
pub fn mount_secure_subs() -> actix_web::Scope {
    web::scope("/sub").service(routes::sub::get_current)
}
