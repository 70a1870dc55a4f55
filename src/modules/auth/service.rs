use schoolhub_auth::create_access_token;
use schoolhub_config::JwtConfig;
use schoolhub_core::{AppError, verify_password};
use schoolhub_db::Store;
use schoolhub_models::{LoginRequest, LoginResponse};
use tracing::{info, instrument, warn};

use crate::metrics;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Verifies the credentials and issues an access token.
    ///
    /// Unknown emails, disabled accounts and wrong passwords all answer with
    /// the same 401 so the response does not reveal which accounts exist.
    #[instrument(skip(store, dto, jwt_config), fields(user.email = %dto.email))]
    pub async fn login_user(
        store: &dyn Store,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = store.find_user_by_email(&dto.email).await? else {
            metrics::track_user_login_failure("unknown_email");
            warn!("Login attempt for unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !user.enabled {
            metrics::track_user_login_failure("disabled");
            warn!(user.id = %user.id, "Login attempt for disabled account");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if !verify_password(&dto.password, &user.password_hash)? {
            metrics::track_user_login_failure("invalid_password");
            warn!(user.id = %user.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let access_token = create_access_token(
            user.id.into_inner(),
            &user.email,
            user.role.as_str(),
            user.school_id.map(|id| id.into_inner()),
            jwt_config,
        )?;

        metrics::track_user_login_success(user.role.as_str());
        info!(user.id = %user.id, user.role = %user.role, "User logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            user,
        })
    }
}
