use actix_cors::Cors;
use actix_web::http::header;

/// CORS policy for the API. The webhook and verify endpoints are called
/// cross-origin by the browser-based admin screens, so preflights must be
/// answered with the authorization and content-type allow-headers. The
/// default origin is "*"; deployments can pin one via
/// `CORS_ALLOWED_ORIGIN`.
pub fn default(origin: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .max_age(3600);

    if origin == "*" {
        cors.allow_any_origin()
    } else {
        cors.allowed_origin(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{Method, header};
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn preflight_from_any_origin_is_accepted_by_default() {
        let app = test::init_service(
            App::new().wrap(default("*")).route(
                "/api/pay/verify",
                web::post().to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let req = test::TestRequest::with_uri("/api/pay/verify")
            .method(Method::OPTIONS)
            .insert_header((header::ORIGIN, "https://app.example.com"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((
                header::ACCESS_CONTROL_REQUEST_HEADERS,
                "authorization,content-type",
            ))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_success());
        assert!(
            res.headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[actix_web::test]
    async fn pinned_origin_rejects_others() {
        let app = test::init_service(
            App::new().wrap(default("https://app.example.com")).route(
                "/api/pay/verify",
                web::post().to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let req = test::TestRequest::with_uri("/api/pay/verify")
            .method(Method::OPTIONS)
            .insert_header((header::ORIGIN, "https://evil.example.com"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_client_error());
    }
}
