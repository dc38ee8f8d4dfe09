use actix_web::web;

pub mod routes {
    pub mod ingest;
    pub mod report;
    pub mod sub;
    pub mod webhook;
}

mod services {
    pub(crate) mod checkout;
    pub(crate) mod report;
    pub(crate) mod webhook;
}

mod dtos {
    pub(crate) mod billing;
}

/// Payment-provider webhook, mounted outside the authenticated scopes.
pub fn mount_webhook() -> actix_web::Scope {
    web::scope("/billing").service(routes::webhook::post_webhook)
}

/// Tenant-facing billing endpoints (JWT protected by the caller).
pub fn mount_billing() -> actix_web::Scope {
    web::scope("/billing")
        .service(routes::sub::get_plans)
        .service(routes::sub::post_subscribe)
        .service(routes::report::get_report)
}

/// Call-platform ingest, authenticated by a shared key header.
pub fn mount_ingest() -> actix_web::Scope {
    web::scope("/ingest").service(routes::ingest::post_call)
}
