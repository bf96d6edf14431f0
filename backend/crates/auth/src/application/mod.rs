//! Application Layer
//!
//! Use cases and application services.

pub mod auto_login;
pub mod check_refresh;
pub mod config;
pub mod guard;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod sessions;
pub mod users;

// Re-exports
pub use auto_login::{AutoLoginOutput, AutoLoginUseCase};
pub use check_refresh::{CheckRefreshUseCase, RefreshContext};
pub use config::AuthConfig;
pub use guard::{AuthGuard, GuardError};
pub use login::{ClientInfo, LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use sessions::SessionsUseCase;
pub use users::{ListUsersInput, UsersUseCase};
