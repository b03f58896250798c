//! Caching as an interceptor
//!
//! Operations opt in by carrying a [`cached`] tag; the [`CacheInterceptor`]
//! registered for the [`CACHE`] pointcut serves repeated calls from the
//! configured cache backend.

pub mod interceptor;

pub use interceptor::{
    CACHE, CacheInterceptor, CachePolicy, KeyGenerator, cached, cached_with, default_key_generator,
};
