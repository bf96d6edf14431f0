//! Register, login and token lifecycle

use auth::application::{
    AutoLoginUseCase, ClientInfo, LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase,
    RegisterInput, RegisterUseCase, SessionsUseCase,
};
use auth::UserRole;
use kernel::paging::Paging;
use kernel::{AppResult, validate};
use platform::client::RequestMeta;
use proto::pb;

use super::BlogService;
use super::convert::{self, millis};

impl BlogService {
    pub async fn register(
        &self,
        _meta: &RequestMeta,
        req: pb::RegisterRequest,
    ) -> AppResult<pb::RegisterResponse> {
        let use_case = RegisterUseCase::new(self.auth_repo.clone(), self.auth_config.clone());
        let user = use_case
            .execute(RegisterInput {
                username: req.username,
                email: req.email,
                password: req.password,
            })
            .await?;

        Ok(pb::RegisterResponse {
            user: Some(convert::user(user)),
        })
    }

    pub async fn login(&self, meta: &RequestMeta, req: pb::LoginRequest) -> AppResult<pb::LoginResponse> {
        let use_case = LoginUseCase::new(
            self.auth_repo.clone(),
            self.auth_repo.clone(),
            self.tokens.clone(),
            self.auth_config.clone(),
        );
        let out = use_case
            .execute(
                LoginInput {
                    username: req.username,
                    email: req.email,
                    password: req.password,
                },
                ClientInfo {
                    user_agent: meta.user_agent.clone(),
                    client_ip: meta.client_ip.clone(),
                },
            )
            .await?;

        let unread_count = self.notifications().unread_count(out.user.id).await?;

        Ok(pb::LoginResponse {
            access_token: out.access_token,
            access_token_expires_at: millis(out.access_payload.expired_at),
            refresh_token: out.refresh_token,
            refresh_token_expires_at: millis(out.refresh_payload.expired_at),
            user: Some(convert::user(out.user)),
            unread_count,
        })
    }

    pub async fn refresh(
        &self,
        _meta: &RequestMeta,
        req: pb::RefreshRequest,
    ) -> AppResult<pb::RefreshResponse> {
        let use_case = RefreshUseCase::new(
            self.auth_repo.clone(),
            self.auth_repo.clone(),
            self.tokens.clone(),
            self.auth_config.clone(),
        );
        let out = use_case.execute(&req.refresh_token).await?;

        Ok(pb::RefreshResponse {
            access_token: out.access_token,
            access_token_expires_at: millis(out.access_payload.expired_at),
        })
    }

    pub async fn auto_login(
        &self,
        _meta: &RequestMeta,
        req: pb::AutoLoginRequest,
    ) -> AppResult<pb::AutoLoginResponse> {
        let use_case = AutoLoginUseCase::new(
            self.auth_repo.clone(),
            self.auth_repo.clone(),
            self.tokens.clone(),
            self.auth_config.clone(),
        );
        let out = use_case.execute(&req.refresh_token).await?;
        let unread_count = self.notifications().unread_count(out.user.id).await?;

        Ok(pb::AutoLoginResponse {
            access_token: out.access_token,
            access_token_expires_at: millis(out.access_payload.expired_at),
            user: Some(convert::user(out.user)),
            unread_count,
        })
    }

    pub async fn logout(&self, _meta: &RequestMeta, req: pb::LogoutRequest) -> AppResult<pb::Empty> {
        LogoutUseCase::new(self.auth_repo.clone(), self.auth_repo.clone(), self.tokens.clone())
            .execute(&req.refresh_token)
            .await?;
        Ok(pb::Empty {})
    }

    pub async fn list_sessions(
        &self,
        meta: &RequestMeta,
        req: pb::ListSessionsRequest,
    ) -> AppResult<pb::ListSessionsResponse> {
        let caller = self.authorize(meta, UserRole::User).await?;
        validate::page(&req)?;

        let (total, sessions) = SessionsUseCase::new(self.auth_repo.clone())
            .list(&caller, req.user_id, req.page())
            .await?;

        Ok(pb::ListSessionsResponse {
            total,
            sessions: sessions.into_iter().map(convert::session).collect(),
        })
    }

    pub async fn delete_session(
        &self,
        meta: &RequestMeta,
        req: pb::DeleteSessionRequest,
    ) -> AppResult<pb::Empty> {
        let caller = self.authorize(meta, UserRole::User).await?;
        SessionsUseCase::new(self.auth_repo.clone())
            .delete(&caller, &req.session_id)
            .await?;
        Ok(pb::Empty {})
    }

    pub async fn delete_expired_sessions(
        &self,
        meta: &RequestMeta,
        _req: pb::DeleteExpiredSessionsRequest,
    ) -> AppResult<pb::DeleteExpiredSessionsResponse> {
        self.authorize(meta, UserRole::Admin).await?;
        let deleted = SessionsUseCase::new(self.auth_repo.clone())
            .delete_expired()
            .await?;
        Ok(pb::DeleteExpiredSessionsResponse {
            deleted: deleted as i64,
        })
    }
}
