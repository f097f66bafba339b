//! Response and error handling for the `acdc` grant.

// self
use crate::{
	_prelude::*,
	config::GrantConfig,
	error::{AuthorizationError, ConfigError},
	grant::{CodeIssuer, GrantContext, IssueCodeRequest},
	http::HttpResponse,
	issue,
	mode::{ResponseMode, ResponseModes, ResponseParams},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	txn::Transaction,
	wire,
};

/// Grant responder issuing cross-domain codes.
///
/// Cheap to clone; share one instance across requests.
#[derive(Clone)]
pub struct AcdcGrant {
	issuer: Arc<dyn CodeIssuer>,
	modes: ResponseModes,
	context: GrantContext,
	default_response_mode: String,
}
impl AcdcGrant {
	/// `response_type` value answered by this grant.
	pub const NAME: &'static str = "acdc";

	/// Returns a builder around `issuer` with the `query` mode and minimal context.
	pub fn builder(issuer: impl 'static + CodeIssuer) -> AcdcGrantBuilder {
		AcdcGrantBuilder::new(Arc::new(issuer))
	}

	/// Creates a grant with the default settings.
	///
	/// The default registry always carries `query`, the default mode, so no validation is
	/// needed.
	pub fn new(issuer: impl 'static + CodeIssuer) -> Self {
		Self::builder(issuer).assemble()
	}

	/// Context level handed to the issuer.
	pub fn context(&self) -> GrantContext {
		self.context
	}

	/// Registered response modes.
	pub fn modes(&self) -> &ResponseModes {
		&self.modes
	}

	/// Answers a decided transaction.
	///
	/// Declined transactions redirect with `access_denied` without consulting the issuer.
	/// Approved transactions redirect with the issued `code` once `complete` (the
	/// framework's hook that finalizes and persists the transaction) succeeds. Every other
	/// outcome is returned as `Err` for the framework's error pipeline, which usually hands
	/// it to [`AcdcGrant::respond_to_error`].
	pub async fn respond<F, Fut>(&self, txn: &Transaction, complete: F) -> Result<HttpResponse>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<()>>,
	{
		const KIND: FlowKind = FlowKind::Grant;

		let span = FlowSpan::new(KIND, "respond");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		match span.instrument(self.decide(txn, complete)).await {
			Ok((response, outcome)) => {
				obs::observe_outcome(KIND, outcome, None);

				Ok(response)
			},
			Err(e) => {
				obs::observe_outcome(KIND, FlowOutcome::Failure, Some(&e));

				Err(e)
			},
		}
	}

	/// Renders `err` to the client through the transaction's response mode.
	///
	/// When the mode is unknown, rejects the transaction, or cannot render, `err` itself is
	/// returned so the framework can answer without a redirect. The issuer is never
	/// consulted.
	pub fn respond_to_error(&self, err: Error, txn: &Transaction) -> Result<HttpResponse> {
		const KIND: FlowKind = FlowKind::GrantError;

		let _guard = FlowSpan::new(KIND, "respond_to_error").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let Some(mode) = self.validated_mode(txn) else {
			obs::observe_outcome(KIND, FlowOutcome::Failure, Some(&err));

			return Err(err);
		};

		match mode.render(txn, &ResponseParams::error(&err, txn.req.state())) {
			Ok(response) => {
				obs::observe_outcome(KIND, FlowOutcome::Rendered, Some(&err));

				Ok(response)
			},
			Err(_) => {
				obs::observe_outcome(KIND, FlowOutcome::Failure, Some(&err));

				Err(err)
			},
		}
	}

	async fn decide<F, Fut>(
		&self,
		txn: &Transaction,
		complete: F,
	) -> Result<(HttpResponse, FlowOutcome)>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<()>>,
	{
		let mode = self.modes.resolve(txn, &self.default_response_mode)?;

		mode.validate(txn)?;

		let state = txn.req.state();

		if !txn.res.allow {
			let response = mode.render(txn, &ResponseParams::access_denied(state))?;

			return Ok((response, FlowOutcome::Denied));
		}

		let request = IssueCodeRequest::from_transaction(txn, self.context);
		let code = issue::invoke(|| self.issuer.issue(request))
			.await?
			.filter(|code| !code.is_empty())
			.issued()
			.ok_or_else(|| {
				AuthorizationError::new("Request denied by authorization server", wire::ACCESS_DENIED)
			})?;

		complete().await?;

		let response = mode.render(txn, &ResponseParams::code(code.expose(), state))?;

		Ok((response, FlowOutcome::Issued))
	}

	fn validated_mode(&self, txn: &Transaction) -> Option<&dyn ResponseMode> {
		let mode = self.modes.resolve(txn, &self.default_response_mode).ok()?;

		mode.validate(txn).ok()?;

		Some(mode)
	}
}
impl Debug for AcdcGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AcdcGrant")
			.field("modes", &self.modes)
			.field("context", &self.context)
			.field("default_response_mode", &self.default_response_mode)
			.finish()
	}
}

/// Builder for [`AcdcGrant`].
pub struct AcdcGrantBuilder {
	issuer: Arc<dyn CodeIssuer>,
	modes: ResponseModes,
	context: GrantContext,
	default_response_mode: String,
}
impl AcdcGrantBuilder {
	/// Creates a builder around a shared issuer.
	pub fn new(issuer: Arc<dyn CodeIssuer>) -> Self {
		Self {
			issuer,
			modes: ResponseModes::default(),
			context: GrantContext::default(),
			default_response_mode: wire::DEFAULT_RESPONSE_MODE.into(),
		}
	}

	/// Replaces the response-mode registry.
	pub fn modes(mut self, modes: ResponseModes) -> Self {
		self.modes = modes;

		self
	}

	/// Sets the context level handed to the issuer.
	pub fn context(mut self, context: GrantContext) -> Self {
		self.context = context;

		self
	}

	/// Sets the mode used when a request names none.
	pub fn default_response_mode(mut self, name: impl Into<String>) -> Self {
		self.default_response_mode = name.into();

		self
	}

	/// Applies a loaded configuration section.
	pub fn config(self, config: GrantConfig) -> Self {
		self.context(config.context).default_response_mode(config.default_response_mode)
	}

	/// Validates the default response mode against the registry.
	pub fn build(self) -> Result<AcdcGrant, ConfigError> {
		if !self.modes.contains(&self.default_response_mode) {
			return Err(ConfigError::UnknownDefaultResponseMode { name: self.default_response_mode });
		}

		Ok(self.assemble())
	}

	fn assemble(self) -> AcdcGrant {
		AcdcGrant {
			issuer: self.issuer,
			modes: self.modes,
			context: self.context,
			default_response_mode: self.default_response_mode,
		}
	}
}
impl Debug for AcdcGrantBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AcdcGrantBuilder")
			.field("modes", &self.modes)
			.field("context", &self.context)
			.field("default_response_mode", &self.default_response_mode)
			.finish()
	}
}
