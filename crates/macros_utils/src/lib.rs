//! Small shared macros for the workspace.

/// Generate the route registration function for a handler module.
///
/// Expands to a `pub fn routes(cfg: &mut ServiceConfig)` that registers
/// every listed handler, so `main` can mount a module with one
/// `.configure(...)` call.
///
/// ```ignore
/// macros_utils::routes! {
///     route health_route,
/// }
/// ```
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    ($(route $handler:ident),* $(,)?) => {
        pub fn routes(cfg: &mut ::actix_web::web::ServiceConfig) {
            $(cfg.service($handler);)*
        }
    };
}
