//! Registration, sign-in and sign-out.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::{
    Client, CurrentUser, RegisterRequest, ResolvedRole, Role, Session, UserProfile, Vendor,
};
use crate::events::AppEvent;
use crate::ports::{
    AppEventEmitter, AuthProvider, ClientRepository, CoreError, RepositoryError, VendorRepository,
};
use crate::utils::now_millis;

pub struct AccountService {
    auth: Arc<dyn AuthProvider>,
    vendors: Arc<dyn VendorRepository>,
    clients: Arc<dyn ClientRepository>,
    emitter: Arc<dyn AppEventEmitter>,
}

impl AccountService {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        vendors: Arc<dyn VendorRepository>,
        clients: Arc<dyn ClientRepository>,
        emitter: Arc<dyn AppEventEmitter>,
    ) -> Self {
        Self {
            auth,
            vendors,
            clients,
            emitter,
        }
    }

    /// Create an account and its profile document.
    ///
    /// The account is removed again if the profile cannot be written.
    pub async fn register(&self, request: &RegisterRequest) -> Result<CurrentUser, CoreError> {
        request.validate()?;

        let principal = self
            .auth
            .create_account(request.email.trim(), &request.password, request.role)
            .await?;
        let created_at = now_millis();

        let profile = match request.role {
            Role::Vendor => {
                let vendor = Vendor::new(&principal.id, request.vendor_profile(), created_at);
                self.vendors
                    .insert(&vendor)
                    .await
                    .map(|()| UserProfile::Vendor(vendor))
            }
            Role::Client => {
                let client = Client::new(&principal.id, request.client_profile(), created_at);
                self.clients
                    .insert(&client)
                    .await
                    .map(|()| UserProfile::Client(client))
            }
        };

        let profile = match profile {
            Ok(profile) => profile,
            Err(cause) => return Err(self.roll_back_account(&principal.id, cause).await),
        };

        info!(
            target: "savaeat.accounts",
            principal_id = %principal.id,
            role = %request.role,
            "account registered"
        );
        self.emitter.emit(AppEvent::AccountRegistered {
            principal_id: principal.id.clone(),
            role: request.role,
        });

        Ok(CurrentUser {
            principal_id: principal.id,
            role: ResolvedRole::from(request.role),
            profile: Some(profile),
        })
    }

    /// Register, then open a session for the new account.
    ///
    /// Once the account and profile exist, a failed sign-in no longer fails the
    /// call: the session comes back as `None` and the user signs in separately.
    pub async fn register_and_sign_in(
        &self,
        request: &RegisterRequest,
    ) -> Result<(CurrentUser, Option<Session>), CoreError> {
        let user = self.register(request).await?;
        match self.sign_in(&request.email, &request.password).await {
            Ok(session) => Ok((user, Some(session))),
            Err(e) => {
                warn!(
                    target: "savaeat.accounts",
                    principal_id = %user.principal_id,
                    error = %e,
                    "registered, but the first sign-in failed"
                );
                Ok((user, None))
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        let session = self.auth.sign_in(email.trim(), password).await.map_err(|e| {
            info!(target: "savaeat.accounts", error = %e, "sign-in rejected");
            CoreError::from(e)
        })?;

        self.emitter.emit(AppEvent::PrincipalChanged {
            principal_id: session.principal_id.clone(),
            signed_in: true,
        });
        Ok(session)
    }

    /// Close the session. Signing out an unknown token is not an error.
    pub async fn sign_out(&self, token: &str) -> Result<(), CoreError> {
        let principal = self.auth.verify_session(token).await?;
        self.auth.sign_out(token).await?;

        if let Some(principal) = principal {
            self.emitter.emit(AppEvent::PrincipalChanged {
                principal_id: principal.id,
                signed_in: false,
            });
        }
        Ok(())
    }

    async fn roll_back_account(&self, principal_id: &str, cause: RepositoryError) -> CoreError {
        match self.auth.remove_account(principal_id).await {
            Ok(()) => {
                warn!(
                    target: "savaeat.accounts",
                    principal_id,
                    error = %cause,
                    "profile creation failed, account removed"
                );
                match cause {
                    RepositoryError::AlreadyExists(id) => {
                        CoreError::Conflict(format!("a profile already exists for {id}"))
                    }
                    other => CoreError::Repository(other),
                }
            }
            Err(undo_err) => {
                error!(
                    target: "savaeat.accounts",
                    principal_id,
                    error = %cause,
                    rollback_error = %undo_err,
                    "account exists without a profile"
                );
                CoreError::partial_write("register", format!("{cause}; rollback failed: {undo_err}"))
            }
        }
    }
}
