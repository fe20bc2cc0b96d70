use askama::Template;

pub const VERIFY_EMAIL_SUBJECT: &str = "Email Verification";

#[derive(Template)]
#[template(path = "verify_email.html")]
pub struct VerifyEmailTemplate<'a> {
    pub name: &'a str,
    pub code: &'a str,
}
