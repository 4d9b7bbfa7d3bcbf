//! Composition root: the single owner of every process-wide client service.

use std::sync::Arc;

use anyhow::Context as _;
use serde::de::DeserializeOwned;

use bloodbank_auth::{
    authorize, AuthzError, GuardDecision, Permission, Role, RolePermissionMap, RouteGuard, RouteId,
    RouteRequirements,
};
use bloodbank_core::Entity;

use crate::config::ClientConfig;
use crate::debounce::Debouncer;
use crate::http::ApiClient;
use crate::list::PagedList;
use crate::notifications::{NotificationService, NotificationStore};
use crate::operation::{AsyncOperation, LogoutHook};
use crate::resources::{Resource, ResourceService};
use crate::session::Session;
use crate::theme::ThemeStore;

/// Forced logout: clear the session and everything tied to it.
struct Teardown {
    session: Arc<Session>,
    notifications: NotificationStore,
}

impl LogoutHook for Teardown {
    fn force_logout(&self) {
        self.session.force_logout();
        self.notifications.shutdown();
    }
}

/// Application services shared by every screen.
#[derive(Clone)]
pub struct AppContext {
    config: Arc<ClientConfig>,
    permissions: Arc<RolePermissionMap>,
    session: Arc<Session>,
    api: ApiClient,
    operations: AsyncOperation,
    notifications: NotificationStore,
    theme: ThemeStore,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("api_base_url", &self.config.api_base_url)
            .field("session", &self.session.snapshot())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Install logging, then build the context.
    pub async fn bootstrap(config: ClientConfig) -> anyhow::Result<Self> {
        bloodbank_observability::tracing::init(&config.log);
        Self::build(config).await
    }

    /// Build the context without touching global logging (tests, embedding).
    pub async fn build(config: ClientConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid client configuration")?;
        let data_dir = config
            .data_dir()
            .context("cannot resolve client data directory")?;

        let permissions = Arc::new(RolePermissionMap::standard());
        let session = Arc::new(Session::new());
        let api = ApiClient::new(config.api_base_url.clone(), session.clone());
        let notifications = NotificationStore::new(config.toast_duration());
        let operations = AsyncOperation::new(Arc::new(Teardown {
            session: session.clone(),
            notifications: notifications.clone(),
        }));
        let theme = ThemeStore::load(&data_dir).await;

        tracing::info!(
            api_base_url = %config.api_base_url,
            data_dir = ?data_dir,
            "client context ready"
        );

        Ok(Self {
            config: Arc::new(config),
            permissions,
            session,
            api,
            operations,
            notifications,
            theme,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn permissions(&self) -> &RolePermissionMap {
        &self.permissions
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    fn role(&self) -> Option<Role> {
        self.session.role()
    }

    pub fn guard(&self) -> RouteGuard<'_> {
        RouteGuard::new(&self.permissions)
    }

    /// Guard a concrete location against the route table.
    ///
    /// Unknown paths only require a signed-in user.
    pub fn check_route(&self, location: &str, has_fallback: bool) -> GuardDecision {
        let requirements = RouteId::from_path(location)
            .map(|route| self.requirements_for(route))
            .unwrap_or_default();
        self.guard()
            .evaluate(&requirements, &self.session.snapshot(), location, has_fallback)
    }

    /// Requirements equivalent to "any one of the route's permissions".
    pub fn requirements_for(&self, route: RouteId) -> RouteRequirements {
        let required = route.required_permissions();
        if required.is_empty() {
            return RouteRequirements::new();
        }
        let roles: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|role| self.permissions.can_access_route(Some(*role), route))
            .collect();
        if roles.is_empty() {
            RouteRequirements::new().permissions(required.iter().copied())
        } else {
            RouteRequirements::new().roles(roles)
        }
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.has_permission(self.role(), permission)
    }

    pub fn can_access(&self, route: RouteId) -> bool {
        self.permissions.can_access_route(self.role(), route)
    }

    /// Navigation entries for the signed-in role.
    pub fn navigation(&self) -> Vec<RouteId> {
        self.permissions.accessible_routes(self.role())
    }

    pub fn require(&self, permission: Permission) -> Result<(), AuthzError> {
        authorize(&self.permissions, self.role(), permission)
    }

    /// A fresh runner for one screen; cancelled with the context.
    pub fn screen_operation(&self) -> AsyncOperation {
        self.operations.child()
    }

    pub fn resource<T: DeserializeOwned>(&self, resource: Resource) -> ResourceService<T> {
        ResourceService::new(self.api.clone(), resource)
    }

    pub fn notification_service(&self) -> NotificationService {
        NotificationService::new(
            self.api.clone(),
            self.notifications.clone(),
            self.screen_operation(),
        )
    }

    pub fn new_list<T: Entity + Clone>(&self) -> PagedList<T> {
        PagedList::new(self.config.default_page_limit, self.config.max_page_limit)
    }

    /// Must be called inside a Tokio runtime.
    pub fn search_debouncer<T: Send + Sync + 'static>(&self) -> Debouncer<T> {
        Debouncer::new(self.config.search_debounce())
    }

    /// User-initiated logout.
    pub fn logout(&self) {
        self.session.logout();
        self.notifications.shutdown();
    }

    /// Process exit: cancel every screen's in-flight work and drop timers.
    pub fn shutdown(&self) {
        self.operations.cancel();
        self.notifications.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloodbank_auth::AuthUser;

    async fn context() -> (AppContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..ClientConfig::default()
        };
        (AppContext::build(config).await.unwrap(), dir)
    }

    #[tokio::test]
    async fn donor_navigation_and_checks() {
        let (ctx, _dir) = context().await;
        ctx.session()
            .establish(AuthUser::new("d1", "Dee", "dee@example.org", Role::Donor), "tok");

        assert!(ctx.can(Permission::RegisterForCampaigns));
        assert!(!ctx.can(Permission::ManageInventory));
        assert_eq!(
            ctx.require(Permission::ManageUsers),
            Err(AuthzError::Forbidden(Permission::ManageUsers))
        );

        let nav = ctx.navigation();
        assert!(nav.contains(&RouteId::Campaigns));
        assert!(nav.contains(&RouteId::DonationHistory));
        assert!(!nav.contains(&RouteId::Inventory));
    }

    #[tokio::test]
    async fn check_route_uses_any_of_semantics() {
        let (ctx, _dir) = context().await;
        ctx.session().establish(
            AuthUser::new("h1", "Hal", "hal@example.org", Role::HospitalStaff),
            "tok",
        );

        // view_donors without manage_donors is enough.
        assert!(ctx.check_route("/donors/abc", false).is_render());
        assert!(ctx.check_route("/inventory/stats", false).is_render());
        assert!(!ctx.check_route("/users", false).is_render());
        assert!(ctx.check_route("/profile", false).is_render());
    }

    #[tokio::test]
    async fn anonymous_is_sent_to_login() {
        let (ctx, _dir) = context().await;
        match ctx.check_route("/reports", false) {
            GuardDecision::Redirect(redirect) => {
                assert_eq!(redirect.to, "/login");
                assert_eq!(redirect.from.as_deref(), Some("/reports"));
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn logout_clears_session_and_toasts() {
        let (ctx, _dir) = context().await;
        ctx.session()
            .establish(AuthUser::new("a1", "Ann", "ann@example.org", Role::Admin), "tok");
        ctx.notifications().show_success("Welcome back");

        ctx.logout();
        assert!(!ctx.session().is_authenticated());
        assert!(ctx.notifications().state().notifications.is_empty());
        assert!(ctx.navigation().is_empty());
    }

    #[tokio::test]
    async fn shutdown_cancels_screens() {
        let (ctx, _dir) = context().await;
        let screen = ctx.screen_operation();
        ctx.shutdown();
        assert!(screen.is_cancelled());
    }
}
