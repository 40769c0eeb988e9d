pub mod admin;
pub mod blog;
pub mod comments;
pub mod error;
pub mod generate;
pub mod login;
pub mod staff;
pub mod uploads;

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Descending order. Order is important.
    // Route resolution will stop at the first match.
    blog::configure(conf);
    comments::configure(conf);
    staff::configure(conf);
    login::configure(conf);
    admin::configure(conf);
    generate::configure(conf);
    uploads::configure(conf);

    conf.service(crate::create_user::register);
}
