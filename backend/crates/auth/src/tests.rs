//! Use case tests for the auth crate, driven by an in-memory store

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex, OnceLock};

    use chrono::Utc;
    use kernel::paging::Page;
    use platform::password::ClearTextPassword;
    use platform::token::TokenMaker;
    use uuid::Uuid;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::{session::Session, user::NewUser, user::User};
    use crate::domain::repository::{SessionRepository, UserFilter, UserPatch, UserRepository};
    use crate::domain::value_object::user_role::UserRole;
    use crate::error::{AuthError, AuthResult};

    pub const PASSWORD: &str = "secret-pass";
    pub const KEY: &[u8; 32] = b"01234567890123456789012345678901";

    /// One Argon2 hash shared by every seeded user
    pub fn password_hash() -> String {
        static HASH: OnceLock<String> = OnceLock::new();
        HASH.get_or_init(|| {
            ClearTextPassword::new(PASSWORD.to_string())
                .unwrap()
                .hash()
                .unwrap()
                .into_phc_string()
        })
        .clone()
    }

    #[derive(Default)]
    pub struct MemoryStore {
        pub users: Mutex<Vec<User>>,
        pub sessions: Mutex<Vec<Session>>,
    }

    impl MemoryStore {
        pub fn seed_user(&self, username: &str, role: UserRole) -> User {
            let mut users = self.users.lock().unwrap();
            let user = User {
                id: users.len() as i64 + 1,
                username: username.to_string(),
                email: format!("{username}@example.com"),
                hashed_password: password_hash(),
                avatar: "/avatar/default.png".to_string(),
                intro: String::new(),
                role,
                deleted: false,
                create_at: Utc::now(),
            };
            users.push(user.clone());
            user
        }

        pub fn mark_deleted(&self, id: i64) {
            let mut users = self.users.lock().unwrap();
            if let Some(u) = users.iter_mut().find(|u| u.id == id) {
                u.deleted = true;
            }
        }

        pub fn session_count(&self) -> usize {
            self.sessions.lock().unwrap().len()
        }
    }

    impl UserRepository for MemoryStore {
        async fn create(&self, user: &NewUser) -> AuthResult<User> {
            let mut users = self.users.lock().unwrap();
            if users
                .iter()
                .any(|u| u.username == user.username || u.email == user.email)
            {
                return Err(AuthError::UserTaken);
            }
            let created = User {
                id: users.len() as i64 + 1,
                username: user.username.clone(),
                email: user.email.clone(),
                hashed_password: user.hashed_password.clone(),
                avatar: user.avatar.clone(),
                intro: String::new(),
                role: UserRole::User,
                deleted: false,
                create_at: Utc::now(),
            };
            users.push(created.clone());
            Ok(created)
        }

        async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn update_info(&self, id: i64, patch: &UserPatch) -> AuthResult<Option<User>> {
            let mut users = self.users.lock().unwrap();
            let Some(user) = users.iter_mut().find(|u| u.id == id && !u.deleted) else {
                return Ok(None);
            };
            if let Some(email) = &patch.email {
                user.email = email.clone();
            }
            if let Some(intro) = &patch.intro {
                user.intro = intro.clone();
            }
            Ok(Some(user.clone()))
        }

        async fn update_password(&self, id: i64, hashed_password: &str) -> AuthResult<bool> {
            let mut users = self.users.lock().unwrap();
            Ok(match users.iter_mut().find(|u| u.id == id && !u.deleted) {
                Some(user) => {
                    user.hashed_password = hashed_password.to_string();
                    true
                }
                None => false,
            })
        }

        async fn update_role(&self, id: i64, role: UserRole) -> AuthResult<bool> {
            let mut users = self.users.lock().unwrap();
            Ok(match users.iter_mut().find(|u| u.id == id && !u.deleted) {
                Some(user) => {
                    user.role = role;
                    true
                }
                None => false,
            })
        }

        async fn set_avatar(&self, id: i64, avatar: &str) -> AuthResult<Option<String>> {
            let mut users = self.users.lock().unwrap();
            Ok(users
                .iter_mut()
                .find(|u| u.id == id && !u.deleted)
                .map(|user| std::mem::replace(&mut user.avatar, avatar.to_string())))
        }

        async fn soft_delete(&self, ids: &[i64]) -> AuthResult<u64> {
            let mut users = self.users.lock().unwrap();
            let mut n = 0;
            for user in users.iter_mut().filter(|u| ids.contains(&u.id) && !u.deleted) {
                user.deleted = true;
                n += 1;
            }
            Ok(n)
        }

        async fn list(&self, filter: &UserFilter) -> AuthResult<(i64, Vec<User>)> {
            let users = self.users.lock().unwrap();
            let matching: Vec<User> = users
                .iter()
                .filter(|u| filter.role.is_none_or(|r| u.role == r))
                .filter(|u| filter.deleted.is_none_or(|d| u.deleted == d))
                .filter(|u| {
                    filter
                        .keyword
                        .as_ref()
                        .is_none_or(|k| u.username.contains(k.as_str()))
                })
                .cloned()
                .collect();
            let total = matching.len() as i64;
            let page = matching
                .into_iter()
                .skip(filter.page.offset as usize)
                .take(filter.page.limit as usize)
                .collect();
            Ok((total, page))
        }
    }

    impl SessionRepository for MemoryStore {
        async fn create(&self, session: &Session) -> AuthResult<()> {
            self.sessions.lock().unwrap().push(session.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Session>> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == id)
                .cloned())
        }

        async fn delete(&self, id: Uuid, user_id: Option<i64>) -> AuthResult<bool> {
            let mut sessions = self.sessions.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|s| !(s.id == id && user_id.is_none_or(|u| s.user_id == u)));
            Ok(sessions.len() < before)
        }

        async fn list(&self, user_id: Option<i64>, page: Page) -> AuthResult<(i64, Vec<Session>)> {
            let sessions = self.sessions.lock().unwrap();
            let matching: Vec<Session> = sessions
                .iter()
                .filter(|s| user_id.is_none_or(|u| s.user_id == u))
                .cloned()
                .collect();
            let total = matching.len() as i64;
            Ok((
                total,
                matching
                    .into_iter()
                    .skip(page.offset as usize)
                    .take(page.limit as usize)
                    .collect(),
            ))
        }

        async fn delete_expired(&self) -> AuthResult<u64> {
            let mut sessions = self.sessions.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|s| !s.is_expired());
            Ok((before - sessions.len()) as u64)
        }
    }

    pub struct Fixture {
        pub store: Arc<MemoryStore>,
        pub tokens: Arc<TokenMaker>,
        pub config: Arc<AuthConfig>,
    }

    pub fn fixture() -> Fixture {
        Fixture {
            store: Arc::new(MemoryStore::default()),
            tokens: Arc::new(TokenMaker::new(KEY).unwrap()),
            config: Arc::new(AuthConfig::default()),
        }
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();

        assert_eq!(config.access_token_duration, Duration::from_secs(900));
        assert_eq!(config.refresh_token_duration, Duration::from_secs(7 * 24 * 3600));
        assert_eq!(config.access_ttl().unwrap(), chrono::Duration::minutes(15));
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();
        assert!(config.access_token_duration > AuthConfig::default().access_token_duration);
    }
}

#[cfg(test)]
mod session_core_tests {
    use super::support::*;
    use crate::application::*;
    use crate::domain::value_object::user_role::UserRole;
    use crate::error::AuthError;
    use kernel::{AppError, ErrorKind};

    fn client() -> ClientInfo {
        ClientInfo {
            user_agent: "Mozilla/5.0".to_string(),
            client_ip: "10.0.0.1".to_string(),
        }
    }

    fn login_input(username: &str, email: &str, password: &str) -> LoginInput {
        LoginInput {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn login(f: &Fixture, username: &str) -> LoginOutput {
        LoginUseCase::new(f.store.clone(), f.store.clone(), f.tokens.clone(), f.config.clone())
            .execute(login_input(username, "", PASSWORD), client())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_creates_user_with_default_avatar() {
        let f = fixture();
        let user = RegisterUseCase::new(f.store.clone(), f.config.clone())
            .execute(RegisterInput {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.avatar, f.config.default_avatar);
        assert_ne!(user.hashed_password, "hunter22");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input_and_duplicates() {
        let f = fixture();
        f.store.seed_user("alice", UserRole::User);
        let register = RegisterUseCase::new(f.store.clone(), f.config.clone());

        let err = register
            .execute(RegisterInput {
                username: "al".into(),
                email: "al@example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = register
            .execute(RegisterInput {
                username: "bob".into(),
                email: "bob@example.com".into(),
                password: "12345".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = register
            .execute(RegisterInput {
                username: "alice".into(),
                email: "other@example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserTaken));
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_login_persists_session_bound_to_refresh_token() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);

        let out = login(&f, "alice").await;

        assert_eq!(out.user.id, alice.id);
        assert_eq!(out.access_payload.user_id, alice.id);
        assert!(out.refresh_payload.expired_at > out.access_payload.expired_at);

        let sessions = f.store.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, out.refresh_payload.id);
        assert_eq!(sessions[0].refresh_token, out.refresh_token);
        assert_eq!(sessions[0].client_ip, "10.0.0.1");
        assert_eq!(sessions[0].user_agent, "Mozilla/5.0");
    }

    #[tokio::test]
    async fn test_login_by_email() {
        let f = fixture();
        f.store.seed_user("alice", UserRole::User);
        let out = LoginUseCase::new(f.store.clone(), f.store.clone(), f.tokens.clone(), f.config.clone())
            .execute(login_input("", "alice@example.com", PASSWORD), client())
            .await
            .unwrap();
        assert_eq!(out.user.username, "alice");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);
        let uc = LoginUseCase::new(f.store.clone(), f.store.clone(), f.tokens.clone(), f.config.clone());

        let err = uc
            .execute(login_input("alice", "", "wrong-pass"), client())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        let app: AppError = err.into();
        assert_eq!(app.kind(), ErrorKind::NotFound);
        assert_eq!(app.message(), "incorrect username or password");

        let err = uc
            .execute(login_input("alice", "alice@example.com", PASSWORD), client())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = uc.execute(login_input("", "", PASSWORD), client()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        f.store.mark_deleted(alice.id);
        let err = uc
            .execute(login_input("alice", "", PASSWORD), client())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
        assert_eq!(f.store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_mints_access_token_without_rotation() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);
        let out = login(&f, "alice").await;

        let refreshed = RefreshUseCase::new(f.store.clone(), f.store.clone(), f.tokens.clone(), f.config.clone())
            .execute(&out.refresh_token)
            .await
            .unwrap();

        assert_eq!(refreshed.user.id, alice.id);
        let payload = f.tokens.verify_token(&refreshed.access_token).unwrap();
        assert_eq!(payload.user_id, alice.id);
        assert_eq!(f.store.session_count(), 1);
    }

    #[tokio::test]
    async fn test_auto_login_returns_user() {
        let f = fixture();
        f.store.seed_user("alice", UserRole::Author);
        let out = login(&f, "alice").await;

        let auto = AutoLoginUseCase::new(f.store.clone(), f.store.clone(), f.tokens.clone(), f.config.clone())
            .execute(&out.refresh_token)
            .await
            .unwrap();
        assert_eq!(auto.user.role, UserRole::Author);
        assert!(!auto.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_binding() {
        let f = fixture();
        f.store.seed_user("alice", UserRole::User);
        let out = login(&f, "alice").await;
        let check = CheckRefreshUseCase::new(f.store.clone(), f.store.clone(), f.tokens.clone());

        // Stored token tampered
        f.store.sessions.lock().unwrap()[0].refresh_token.push('x');
        let err = check.execute(&out.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionMismatch));
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);

        // Session deleted
        f.store.sessions.lock().unwrap().clear();
        let err = check.execute(&out.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionNotExists));
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_check_refresh_rejects_expired_access_and_garbage() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);
        let check = CheckRefreshUseCase::new(f.store.clone(), f.store.clone(), f.tokens.clone());

        let err = check.execute("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = check.execute("not-a-token").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken(_)));

        let (expired, _) = f
            .tokens
            .create_token(alice.id, -chrono::Duration::minutes(1))
            .unwrap();
        let err = check.execute(&expired).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.kind(), ErrorKind::Unauthenticated);
        assert!(!app.is_refreshable());
    }

    #[tokio::test]
    async fn test_check_refresh_rejects_deleted_user() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);
        let out = login(&f, "alice").await;
        f.store.mark_deleted(alice.id);

        let err = CheckRefreshUseCase::new(f.store.clone(), f.store.clone(), f.tokens.clone())
            .execute(&out.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserInactive));
    }

    #[tokio::test]
    async fn test_logout_deletes_session() {
        let f = fixture();
        f.store.seed_user("alice", UserRole::User);
        let out = login(&f, "alice").await;

        LogoutUseCase::new(f.store.clone(), f.store.clone(), f.tokens.clone())
            .execute(&out.refresh_token)
            .await
            .unwrap();
        assert_eq!(f.store.session_count(), 0);

        let err = RefreshUseCase::new(f.store.clone(), f.store.clone(), f.tokens.clone(), f.config.clone())
            .execute(&out.refresh_token)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }
}

#[cfg(test)]
mod guard_tests {
    use super::support::*;
    use crate::application::guard::{AuthGuard, GuardError};
    use crate::domain::value_object::user_role::UserRole;
    use kernel::{AppError, ErrorKind};

    fn bearer(f: &Fixture, user_id: i64, ttl: chrono::Duration) -> String {
        let (token, _) = f.tokens.create_token(user_id, ttl).unwrap();
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn test_missing_header() {
        let f = fixture();
        let guard = AuthGuard::new(f.store.clone(), f.tokens.clone());

        let ghost = guard.authorize(None, UserRole::Ghost).await.unwrap();
        assert_eq!(ghost.id, 0);

        let err = guard.authorize(None, UserRole::User).await.unwrap_err();
        assert!(matches!(err, GuardError::MissingHeader));
    }

    #[tokio::test]
    async fn test_valid_token_on_public_operation_resolves_user() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);
        let guard = AuthGuard::new(f.store.clone(), f.tokens.clone());

        let header = bearer(&f, alice.id, chrono::Duration::minutes(5));
        let user = guard.authorize(Some(&header), UserRole::Ghost).await.unwrap();
        assert_eq!(user.id, alice.id);
    }

    #[tokio::test]
    async fn test_role_gate() {
        let f = fixture();
        let user = f.store.seed_user("bob", UserRole::User);
        let admin = f.store.seed_user("root", UserRole::Admin);
        let guard = AuthGuard::new(f.store.clone(), f.tokens.clone());

        let header = bearer(&f, user.id, chrono::Duration::minutes(5));
        let err = guard.authorize(Some(&header), UserRole::Author).await.unwrap_err();
        assert_eq!(AppError::from(err).kind(), ErrorKind::PermissionDenied);

        let header = bearer(&f, admin.id, chrono::Duration::minutes(5));
        assert!(guard.authorize(Some(&header), UserRole::Author).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_admin_token_is_refreshable_unauthenticated() {
        let f = fixture();
        let admin = f.store.seed_user("root", UserRole::Admin);
        let guard = AuthGuard::new(f.store.clone(), f.tokens.clone());

        let header = bearer(&f, admin.id, -chrono::Duration::minutes(1));
        let err = guard.authorize(Some(&header), UserRole::Admin).await.unwrap_err();
        let app = AppError::from(err);
        assert_eq!(app.kind(), ErrorKind::Unauthenticated);
        assert!(app.is_refreshable());
    }

    #[tokio::test]
    async fn test_bad_headers_and_deleted_users() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);
        let guard = AuthGuard::new(f.store.clone(), f.tokens.clone());

        for header in ["Bearer", "Token abc", "Bearer a b", "Bearer v2.local.garbage"] {
            let err = guard.authorize(Some(header), UserRole::User).await.unwrap_err();
            let app = AppError::from(err);
            assert_eq!(app.kind(), ErrorKind::Unauthenticated);
            assert!(!app.is_refreshable());
        }

        let header = bearer(&f, alice.id, chrono::Duration::minutes(5));
        f.store.mark_deleted(alice.id);
        let err = guard.authorize(Some(&header), UserRole::User).await.unwrap_err();
        assert!(matches!(err, GuardError::UserNotFound));
    }
}

#[cfg(test)]
mod management_tests {
    use super::support::*;
    use crate::application::{ListUsersInput, SessionsUseCase, UsersUseCase};
    use crate::domain::entity::session::Session;
    use crate::domain::repository::UserPatch;
    use crate::domain::value_object::user_role::UserRole;
    use crate::error::AuthError;
    use kernel::ErrorKind;
    use kernel::paging::{Page, Paging, Sorting};
    use platform::token::Payload;

    fn add_session(f: &Fixture, user_id: i64, ttl: chrono::Duration) -> Session {
        let payload = Payload::new(user_id, ttl);
        let session = Session::new("t".into(), &payload, String::new(), String::new());
        f.store.sessions.lock().unwrap().push(session.clone());
        session
    }

    #[tokio::test]
    async fn test_sessions_visibility() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);
        let bob = f.store.seed_user("bob", UserRole::User);
        let admin = f.store.seed_user("root", UserRole::Admin);
        add_session(&f, alice.id, chrono::Duration::hours(1));
        let bobs = add_session(&f, bob.id, chrono::Duration::hours(1));

        let uc = SessionsUseCase::new(f.store.clone());
        let page = Page::new(1, 10);

        let (total, _) = uc.list(&alice, bob.id, page).await.unwrap();
        assert_eq!(total, 1);
        let (total, _) = uc.list(&admin, 0, page).await.unwrap();
        assert_eq!(total, 2);
        let (total, list) = uc.list(&admin, bob.id, page).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(list[0].id, bobs.id);

        let err = uc.delete(&alice, &bobs.id.to_string()).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
        let err = uc.delete(&alice, "not-a-uuid").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        uc.delete(&admin, &bobs.id.to_string()).await.unwrap();
        assert_eq!(f.store.session_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_expired_sessions() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);
        add_session(&f, alice.id, chrono::Duration::hours(1));
        add_session(&f, alice.id, -chrono::Duration::seconds(1));
        add_session(&f, alice.id, -chrono::Duration::hours(1));

        let deleted = SessionsUseCase::new(f.store.clone()).delete_expired().await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(f.store.session_count(), 1);
    }

    #[tokio::test]
    async fn test_update_info_validates() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);
        let uc = UsersUseCase::new(f.store.clone());

        let err = uc
            .update_info(
                &alice,
                UserPatch {
                    email: Some("nope".into()),
                    intro: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let user = uc
            .update_info(
                &alice,
                UserPatch {
                    email: None,
                    intro: Some("hello".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(user.intro, "hello");
        assert_eq!(user.email, alice.email);
    }

    #[tokio::test]
    async fn test_change_password_requires_old_password() {
        let f = fixture();
        let alice = f.store.seed_user("alice", UserRole::User);
        let uc = UsersUseCase::new(f.store.clone());

        let err = uc
            .change_password(&alice, "wrong-pass".into(), "new-secret".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IncorrectPassword));

        uc.change_password(&alice, PASSWORD.into(), "new-secret".into())
            .await
            .unwrap();
        let stored = uc.find_active(alice.id).await.unwrap();
        assert_ne!(stored.hashed_password, alice.hashed_password);
    }

    #[tokio::test]
    async fn test_admin_user_management() {
        let f = fixture();
        let admin = f.store.seed_user("root", UserRole::Admin);
        let alice = f.store.seed_user("alice", UserRole::User);
        let uc = UsersUseCase::new(f.store.clone());

        uc.update_role(&admin, alice.id, "author").await.unwrap();
        assert_eq!(uc.find_active(alice.id).await.unwrap().role, UserRole::Author);

        let err = uc.update_role(&admin, alice.id, "ghost").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = uc.delete_users(&admin, &[alice.id, admin.id]).await.unwrap_err();
        assert!(matches!(err, AuthError::SelfDeletion));

        assert_eq!(uc.delete_users(&admin, &[alice.id, alice.id]).await.unwrap(), 1);
        assert!(matches!(
            uc.find_active(alice.id).await.unwrap_err(),
            AuthError::UserNotFound
        ));
    }

    struct ListReq {
        order_by: &'static str,
    }

    impl Paging for ListReq {
        fn page_id(&self) -> i32 {
            1
        }
        fn page_size(&self) -> i32 {
            10
        }
    }

    impl Sorting for ListReq {
        fn order(&self) -> &str {
            "asc"
        }
        fn order_by(&self) -> &str {
            self.order_by
        }
    }

    #[tokio::test]
    async fn test_list_users_filters() {
        let f = fixture();
        f.store.seed_user("root", UserRole::Admin);
        f.store.seed_user("alice", UserRole::Author);
        f.store.seed_user("bob", UserRole::User);
        let uc = UsersUseCase::new(f.store.clone());

        let (total, users) = uc
            .list(ListUsersInput {
                page: &ListReq { order_by: "id" },
                keyword: "",
                role: "author",
                deleted: None,
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(users[0].username, "alice");

        let err = uc
            .list(ListUsersInput {
                page: &ListReq { order_by: "email" },
                keyword: "",
                role: "",
                deleted: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
