//! JWT assertion exchange for cross-domain codes.

// self
use crate::{
	_prelude::*,
	config::ExchangeConfig,
	error::{ConfigError, TokenError},
	exchange::{ExchangeContext, ExchangeRequest, IssuedTokens, TokenEnvelope, TokenIssuer, TokenRequest},
	http::HttpResponse,
	issue,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	wire,
};

/// Token endpoint responder redeeming cross-domain codes.
#[derive(Clone)]
pub struct JwtAcdcExchange {
	issuer: Arc<dyn TokenIssuer>,
	context: ExchangeContext,
}
impl JwtAcdcExchange {
	/// `grant_type` value routed to this exchange (RFC 7523 section 2.1).
	pub const GRANT_TYPE: &'static str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

	/// Returns a builder around `issuer`.
	pub fn builder(issuer: impl 'static + TokenIssuer) -> JwtAcdcExchangeBuilder {
		JwtAcdcExchangeBuilder { issuer: Arc::new(issuer), context: ExchangeContext::default() }
	}

	/// Creates an exchange delivering only the client and assertion to `issuer`.
	pub fn new(issuer: impl 'static + TokenIssuer) -> Self {
		Self::builder(issuer).build()
	}

	/// Context level handed to the issuer.
	pub fn context(&self) -> ExchangeContext {
		self.context
	}

	/// Redeems the assertion carried by `request`.
	///
	/// Returns a `200` JSON token response on success. Every failure is returned as `Err`
	/// for the framework to render; nothing is written in that case.
	pub async fn respond(&self, request: &ExchangeRequest) -> Result<HttpResponse> {
		const KIND: FlowKind = FlowKind::Exchange;

		let span = FlowSpan::new(KIND, "respond");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		match span.instrument(self.redeem(request)).await {
			Ok(envelope) => {
				obs::observe_outcome(KIND, FlowOutcome::Issued, None);

				Ok(HttpResponse::json_no_store(envelope.to_json()))
			},
			Err(e) => {
				let outcome = match &e {
					Error::Token(e) if e.code() == wire::INVALID_GRANT => FlowOutcome::Denied,
					_ => FlowOutcome::Failure,
				};

				obs::observe_outcome(KIND, outcome, Some(&e));

				Err(e)
			},
		}
	}

	async fn redeem(&self, request: &ExchangeRequest) -> Result<TokenEnvelope> {
		if request.body.is_none() {
			return Err(ConfigError::BodyNotParsed.into());
		}

		let assertion = request.assertion().ok_or_else(|| {
			TokenError::new("Missing required parameter: assertion", wire::INVALID_REQUEST)
		})?;
		let token_request = TokenRequest::from_exchange(request, assertion, self.context);
		let tokens = issue::invoke(|| self.issuer.issue(token_request))
			.await?
			.filter(|tokens: &IssuedTokens| !tokens.access_token.is_empty())
			.issued()
			.ok_or_else(|| TokenError::new("Invalid authorization code", wire::INVALID_GRANT))?;

		Ok(tokens.into())
	}
}
impl Debug for JwtAcdcExchange {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("JwtAcdcExchange").field("context", &self.context).finish()
	}
}

/// Builder for [`JwtAcdcExchange`].
pub struct JwtAcdcExchangeBuilder {
	issuer: Arc<dyn TokenIssuer>,
	context: ExchangeContext,
}
impl JwtAcdcExchangeBuilder {
	/// Sets the context level handed to the issuer.
	pub fn context(mut self, context: ExchangeContext) -> Self {
		self.context = context;

		self
	}

	/// Applies a loaded configuration section.
	pub fn config(self, config: ExchangeConfig) -> Self {
		self.context(config.context)
	}

	/// Finalizes the exchange.
	pub fn build(self) -> JwtAcdcExchange {
		JwtAcdcExchange { issuer: self.issuer, context: self.context }
	}
}
impl Debug for JwtAcdcExchangeBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("JwtAcdcExchangeBuilder").field("context", &self.context).finish()
	}
}
