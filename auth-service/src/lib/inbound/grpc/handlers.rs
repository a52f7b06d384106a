use tonic::Status;

use crate::domain::identity::models::AuthProvider;
use crate::domain::identity::models::AuthResult;
use crate::domain::identity::models::IdentityView;
use crate::identity::errors::AuthError;
use crate::proto::AuthProvider as ProtoAuthProvider;

pub mod google_login;
pub mod login;
pub mod register;
pub mod validate_token;

impl From<AuthProvider> for ProtoAuthProvider {
    fn from(provider: AuthProvider) -> Self {
        match provider {
            AuthProvider::Custom => ProtoAuthProvider::Custom,
            AuthProvider::Google => ProtoAuthProvider::Google,
        }
    }
}

impl From<IdentityView> for crate::proto::UserInfo {
    fn from(view: IdentityView) -> Self {
        Self {
            user_id: view.user_id.to_string(),
            username: view.username,
            age: view.age,
            profession: view.profession,
            education: view.education,
            auth_provider: ProtoAuthProvider::from(view.provider) as i32,
        }
    }
}

impl From<AuthResult> for crate::proto::AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            token_type: result.token_type,
            expires_in: result.expires_in,
            user_info: Some(result.user.into()),
        }
    }
}

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidUsername(_)
            | AuthError::InvalidAge(_)
            | AuthError::InvalidProfile(_)
            | AuthError::InvalidProvider(_)
            | AuthError::InvalidArgument(_) => Status::invalid_argument(err.to_string()),
            AuthError::DuplicateUsername(_) | AuthError::DuplicateProviderIdentity { .. } => {
                Status::already_exists(err.to_string())
            }
            AuthError::InvalidCredentials => Status::unauthenticated(err.to_string()),
            AuthError::NotImplemented(_) => Status::unimplemented(err.to_string()),
            AuthError::FederatedIdentityNotRegistered { .. } => Status::not_found(err.to_string()),
            AuthError::IdentityNotFoundAfterTokenValid(_)
            | AuthError::Password(_)
            | AuthError::Token(_)
            | AuthError::DatabaseError(_)
            | AuthError::Unknown(_) => {
                tracing::error!(error = %err, "Request failed with internal error");
                Status::internal("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tonic::Code;

    use super::*;
    use crate::domain::identity::models::IdentityId;

    #[test]
    fn test_error_to_status_codes() {
        let cases = [
            (AuthError::DuplicateUsername("alice".into()), Code::AlreadyExists),
            (AuthError::InvalidCredentials, Code::Unauthenticated),
            (AuthError::NotImplemented("Google login".into()), Code::Unimplemented),
            (AuthError::InvalidArgument("bad".into()), Code::InvalidArgument),
            (AuthError::DatabaseError("down".into()), Code::Internal),
            (
                AuthError::IdentityNotFoundAfterTokenValid("ghost".into()),
                Code::Internal,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(Status::from(err).code(), code);
        }
    }

    #[test]
    fn test_internal_status_hides_details() {
        let status = Status::from(AuthError::DatabaseError("password=hunter2".into()));
        assert!(!status.message().contains("hunter2"));
    }

    #[test]
    fn test_user_info_from_view() {
        let id = IdentityId::new();
        let info = crate::proto::UserInfo::from(IdentityView {
            user_id: id,
            username: "alice".to_string(),
            age: 30,
            profession: "Engineer".to_string(),
            education: "BSc".to_string(),
            provider: AuthProvider::Google,
        });

        assert_eq!(info.user_id, id.to_string());
        assert_eq!(info.auth_provider, ProtoAuthProvider::Google as i32);
    }
}
