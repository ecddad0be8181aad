use crate::error::{Error, Result};
use crate::factory::{self, ErrorExample, ResponseEnvelopeConfig, ResponseOptions};
use crate::fragment::{Annotation, Fragment};
use crate::operator::OperationOptions;
use crate::schema::{FieldOptions, Payload};
use http::StatusCode;

enum State {
    Open {
        fragments: Vec<Fragment>,
        error: Option<Error>,
    },
    Finalized,
}

/// Chainable accumulator of documentation fragments for one endpoint.
///
/// Each `with_*` call appends exactly one fragment. Failures inside the
/// chain are deferred and the first one is returned by [`build`](Self::build).
/// A builder is finalized by its first `build`; any later use yields
/// [`Error::AlreadyFinalized`].
///
/// ```
/// use http::StatusCode;
/// use openapi_compose::builder::ApiDecoratorBuilder;
/// use openapi_compose::factory::ErrorExample;
/// use openapi_compose::operator::OperationOptions;
///
/// let annotation = ApiDecoratorBuilder::new()
///     .with_operation(OperationOptions::new("Create New User"))
///     .with_bearer_auth(None)
///     .with_status_response(StatusCode::CREATED, "createUser")
///     .with_bad_request_response(&[ErrorExample::new("case1", "error1")])
///     .build()
///     .unwrap();
/// assert_eq!(annotation.len(), 4);
/// ```
pub struct ApiDecoratorBuilder {
    defaults: ResponseEnvelopeConfig,
    state: State,
}

impl Default for ApiDecoratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiDecoratorBuilder {
    pub fn new() -> Self {
        Self::with_config(ResponseEnvelopeConfig::default())
    }

    /// A builder whose status and body responses default to `defaults`.
    pub fn with_config(defaults: ResponseEnvelopeConfig) -> Self {
        Self {
            defaults,
            state: State::Open {
                fragments: Vec::new(),
                error: None,
            },
        }
    }

    pub fn defaults(&self) -> &ResponseEnvelopeConfig {
        &self.defaults
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, State::Finalized)
    }

    pub fn with_operation(&mut self, options: OperationOptions) -> &mut Self {
        self.push(Fragment::operation_info(&options))
    }

    pub fn with_bearer_auth(&mut self, name: Option<&str>) -> &mut Self {
        self.push(Ok(Fragment::bearer_auth(name)))
    }

    pub fn with_cookie_auth(&mut self, name: Option<&str>) -> &mut Self {
        self.push(Ok(Fragment::cookie_auth(name)))
    }

    pub fn with_status_response(&mut self, status: StatusCode, key: &str) -> &mut Self {
        self.with_status_response_options(status, key, ResponseOptions::default())
    }

    pub fn with_status_response_options(
        &mut self,
        status: StatusCode,
        key: &str,
        options: ResponseOptions,
    ) -> &mut Self {
        let options = self.apply_defaults(options);
        self.push(factory::status_only(status, key, &options))
    }

    pub fn with_body_response<P: Into<Payload>>(
        &mut self,
        status: StatusCode,
        key: &str,
        payload: P,
    ) -> &mut Self {
        self.with_body_response_options(status, key, payload, ResponseOptions::default())
    }

    pub fn with_body_response_options<P: Into<Payload>>(
        &mut self,
        status: StatusCode,
        key: &str,
        payload: P,
        options: ResponseOptions,
    ) -> &mut Self {
        let options = self.apply_defaults(options);
        self.push(factory::detail_body(status, key, payload.into(), &options))
    }

    pub fn with_exception(&mut self, status: StatusCode, errors: &[ErrorExample]) -> &mut Self {
        self.push(factory::exception_set(status, errors))
    }

    /// 400 with the given examples.
    pub fn with_error_responses(&mut self, errors: &[ErrorExample]) -> &mut Self {
        self.with_exception(StatusCode::BAD_REQUEST, errors)
    }

    pub fn with_bad_request_response(&mut self, errors: &[ErrorExample]) -> &mut Self {
        self.with_exception(StatusCode::BAD_REQUEST, errors)
    }

    pub fn with_unauthorized_response(&mut self, errors: &[ErrorExample]) -> &mut Self {
        self.with_exception(StatusCode::UNAUTHORIZED, errors)
    }

    pub fn with_forbidden_response(&mut self, errors: &[ErrorExample]) -> &mut Self {
        self.with_exception(StatusCode::FORBIDDEN, errors)
    }

    pub fn with_not_found_response(&mut self, errors: &[ErrorExample]) -> &mut Self {
        self.with_exception(StatusCode::NOT_FOUND, errors)
    }

    pub fn with_conflict_response(&mut self, errors: &[ErrorExample]) -> &mut Self {
        self.with_exception(StatusCode::CONFLICT, errors)
    }

    pub fn with_internal_server_error_response(&mut self, errors: &[ErrorExample]) -> &mut Self {
        self.with_exception(StatusCode::INTERNAL_SERVER_ERROR, errors)
    }

    pub fn with_form_data_request(&mut self, key: &str, file_field_name: &str) -> &mut Self {
        self.with_form_data_request_options(key, file_field_name, FieldOptions::default())
    }

    pub fn with_form_data_request_options(
        &mut self,
        key: &str,
        file_field_name: &str,
        options: FieldOptions,
    ) -> &mut Self {
        self.push(factory::file_upload_request(key, file_field_name, &options))
    }

    /// Escape hatch for metadata the other methods don't cover.
    pub fn with_decorator(&mut self, fragment: Fragment) -> &mut Self {
        self.push(Ok(fragment))
    }

    /// Finalizes the builder into one annotation holding every fragment in
    /// call order.
    pub fn build(&mut self) -> Result<Annotation> {
        match std::mem::replace(&mut self.state, State::Finalized) {
            State::Open {
                error: Some(error), ..
            } => Err(error),
            State::Open { fragments, .. } => {
                if fragments.is_empty() {
                    log::warn!("Building an annotation with no fragments");
                }
                Annotation::new(fragments)
            }
            State::Finalized => Err(Error::AlreadyFinalized),
        }
    }

    fn apply_defaults(&self, mut options: ResponseOptions) -> ResponseOptions {
        options.envelope = options.envelope.merged_over(&self.defaults);
        options
    }

    fn push(&mut self, fragment: Result<Fragment>) -> &mut Self {
        match &mut self.state {
            State::Open { fragments, error } => match fragment {
                Ok(fragment) => fragments.push(fragment),
                Err(e) => {
                    if error.is_none() {
                        *error = Some(e);
                    }
                }
            },
            State::Finalized => {
                log::error!("Fragment added to an already finalized builder; ignoring it");
            }
        }
        self
    }
}
