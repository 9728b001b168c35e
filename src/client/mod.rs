//! Client-side form layer: local validation plus calls to the auth endpoints.

pub mod api;
pub mod forms;

pub use api::{AuthClient, ClientError};
pub use forms::{LoginForm, RegisterForm, Submission};
