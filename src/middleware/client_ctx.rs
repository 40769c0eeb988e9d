use crate::permission::{self, Capability};
use crate::user::Profile;
use crate::web::error::ApiError;
use actix_session::Session;
use actix_web::dev::{
    self, Extensions, Payload, Service, ServiceRequest, ServiceResponse, Transform,
};
use actix_web::{web::Data, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

/// Client data stored for a single request cycle.
/// Distinct from ClientCtx because it is defined through request data.
#[derive(Clone, Debug, Default)]
pub struct ClientCtxInner {
    /// User data. Optional. None is a guest visitor.
    pub client: Option<Profile>,
}

impl ClientCtxInner {
    pub async fn from_session(session: &Session) -> Self {
        let client = crate::session::authenticate_client_by_session(session).await;
        ClientCtxInner { client }
    }
}

/// Client context passed to routes.
/// Wraps ClientCtxInner, which is set at the beginning of the request.
#[derive(Clone, Debug)]
pub struct ClientCtx(Data<ClientCtxInner>);

impl Default for ClientCtx {
    fn default() -> Self {
        Self(Data::new(ClientCtxInner::default()))
    }
}

impl ClientCtx {
    fn get_or_default_from_extensions(extensions: &mut Extensions) -> Self {
        match extensions.get::<Data<ClientCtxInner>>() {
            // Existing record in extensions; pull it and return clone.
            Some(cbox) => Self(cbox.clone()),
            // No existing record; create and insert it.
            None => {
                let cbox = Data::new(ClientCtxInner::default());
                extensions.insert(cbox.clone());
                Self(cbox)
            }
        }
    }

    /// Returns either the user's id or None for guests.
    pub fn get_id(&self) -> Option<i32> {
        self.0.client.as_ref().map(|u| u.id)
    }

    pub fn get_user(&self) -> Option<&Profile> {
        self.0.client.as_ref()
    }

    pub fn is_user(&self) -> bool {
        self.0.client.is_some()
    }

    pub fn can(&self, capability: Capability) -> bool {
        match self.get_user() {
            Some(user) => permission::role_can(user.role, capability),
            None => false,
        }
    }

    pub fn can_modify_post(&self, post: &crate::orm::blog_posts::Model) -> bool {
        permission::can_modify_post(self.get_user(), post)
    }

    pub fn can_modify_staff(&self, profile: &crate::orm::staff::Model) -> bool {
        permission::can_modify_staff(self.get_user(), profile)
    }

    /// Require a session. Returns the profile or the 401-equivalent error.
    pub fn require_login(&self) -> Result<&Profile, ApiError> {
        self.get_user().ok_or(ApiError::AuthenticationRequired)
    }

    /// Require a specific capability. Returns () or the 403-equivalent error.
    pub fn require_capability(&self, capability: Capability) -> Result<(), ApiError> {
        self.require_login()?;
        if !self.can(capability) {
            return Err(ApiError::Forbidden("Insufficient permissions"));
        }
        Ok(())
    }

    /// Require a login that may author content: an approved account, or one
    /// whose role bypasses approval bookkeeping.
    pub fn require_approved_author(&self) -> Result<&Profile, ApiError> {
        let user = self.require_login()?;
        if !permission::can_author(Some(user)) {
            return Err(ApiError::Forbidden("Account pending approval"));
        }
        Ok(user)
    }
}

/// This implementation is what actually provides the `client: ClientCtx` in the parameters of route functions.
impl FromRequest for ClientCtx {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(ClientCtx::get_or_default_from_extensions(
            &mut req.extensions_mut(),
        )))
    }
}

impl<S: 'static, B> Transform<S, ServiceRequest> for ClientCtx
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ClientCtxMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ClientCtxMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Client context middleware
pub struct ClientCtxMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ClientCtxMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();

        // Borrows of `req` must be done in a precise way to avoid conflicts.
        // This order is important.
        let (httpreq, payload) = req.into_parts();
        let session = Session::extract(&httpreq).into_inner();
        let req = ServiceRequest::from_parts(httpreq, payload);

        Box::pin(async move {
            match session {
                Ok(session) => {
                    let inner = ClientCtxInner::from_session(&session).await;
                    req.extensions_mut().insert(Data::new(inner));
                }
                Err(err) => {
                    log::error!("Unable to extract Session data in middleware: {}", err);
                }
            };

            svc.call(req).await
        })
    }
}
