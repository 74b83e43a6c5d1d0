//! Session and role resolution.
//!
//! Accounts registered through `AccountService` carry their role, so one
//! lookup finds the profile. Older accounts without a role are classified by
//! probing the vendor collection, then the client collection.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{CurrentUser, Principal, ResolvedRole, Role, UserProfile};
use crate::ports::{AuthProvider, ClientRepository, CoreError, RepositoryError, VendorRepository};

pub struct IdentityService {
    auth: Arc<dyn AuthProvider>,
    vendors: Arc<dyn VendorRepository>,
    clients: Arc<dyn ClientRepository>,
}

impl IdentityService {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        vendors: Arc<dyn VendorRepository>,
        clients: Arc<dyn ClientRepository>,
    ) -> Self {
        Self {
            auth,
            vendors,
            clients,
        }
    }

    /// The signed-in user behind `token`, or `None` if the token isn't live.
    pub async fn current_user(&self, token: &str) -> Result<Option<CurrentUser>, CoreError> {
        match self.auth.verify_session(token).await? {
            Some(principal) => Ok(Some(self.resolve(&principal).await?)),
            None => Ok(None),
        }
    }

    pub async fn resolve_role(&self, principal: &Principal) -> Result<ResolvedRole, CoreError> {
        Ok(self.resolve(principal).await?.role)
    }

    /// Classify `principal` and load its profile.
    pub async fn resolve(&self, principal: &Principal) -> Result<CurrentUser, CoreError> {
        let profile = match principal.role {
            Some(role) => {
                let profile = self.load(&principal.id, role).await?;
                if profile.is_none() {
                    warn!(
                        target: "savaeat.identity",
                        principal_id = %principal.id,
                        %role,
                        "account has a role but no profile document"
                    );
                }
                profile
            }
            None => {
                debug!(target: "savaeat.identity", principal_id = %principal.id, "probing for role");
                match self.load(&principal.id, Role::Vendor).await? {
                    Some(profile) => Some(profile),
                    None => self.load(&principal.id, Role::Client).await?,
                }
            }
        };

        Ok(CurrentUser {
            principal_id: principal.id.clone(),
            role: profile
                .as_ref()
                .map_or(ResolvedRole::Unknown, |p| p.role().into()),
            profile,
        })
    }

    async fn load(&self, id: &str, role: Role) -> Result<Option<UserProfile>, CoreError> {
        let result = match role {
            Role::Vendor => self.vendors.get_by_id(id).await.map(UserProfile::Vendor),
            Role::Client => self.clients.get_by_id(id).await.map(UserProfile::Client),
        };
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
