pub mod routes {
    pub mod pay;
    pub mod sub;
}

pub mod services {
    pub mod pay;
    pub mod sub;
}

pub mod dtos {
    pub mod pay;
    pub mod sub;
}

pub mod misc {
    pub mod reference;
}

pub use crate::routes::*;
pub mod mount;
