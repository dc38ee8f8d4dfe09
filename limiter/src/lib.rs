use middleware::global::GlobalLimiter;

pub mod middleware {
    pub mod global;
}

/// Process-wide request rate limit, applied before any other middleware.
pub fn global_middleware(permits_per_sec: u32) -> GlobalLimiter {
    GlobalLimiter::new(permits_per_sec)
}
