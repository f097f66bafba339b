//! Demonstrates issuing a cross-domain code from an approved transaction and redeeming it
//! at the partner's token endpoint.

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
use parking_lot::Mutex;
use url::Url;
// self
use oauth2_acdc::{
	auth::{ClientId, TokenSecret, UserId},
	error::{Error, Result as AcdcResult},
	exchange::{ExchangeContext, ExchangeRequest, IssuedTokens, JwtAcdcExchange, TokenIssuer, TokenRequest},
	grant::{AcdcGrant, CodeIssuer, IssueCodeRequest},
	issue::{IssueFuture, IssueOutcome},
	txn::{AuthorizationDecision, AuthorizationRequest, Client, Transaction, User},
};

/// Keeps issued codes in memory, keyed by the code, with the audience and PKCE challenge
/// they were bound to.
#[derive(Default)]
struct MemoryCodes {
	codes: Mutex<HashMap<String, (String, Option<String>)>>,
}
impl MemoryCodes {
	async fn mint(&self, request: IssueCodeRequest<'_>) -> AcdcResult<IssueOutcome<TokenSecret>> {
		let Some(audience) = request.audience else {
			return Ok(IssueOutcome::Denied);
		};
		let mut codes = self.codes.lock();
		let code = format!("acdc-{}-{}", request.client.id, codes.len() + 1);

		codes.insert(code.clone(), (audience.to_owned(), request.pkce.challenge));

		Ok(IssueOutcome::Issued(TokenSecret::new(code)))
	}

	async fn redeem(&self, request: TokenRequest<'_>) -> AcdcResult<IssueOutcome<IssuedTokens>> {
		let mut codes = self.codes.lock();

		// A real partner verifies the S256 challenge against the verifier and the audience
		// against its own token endpoint.
		let Some((_audience, Some(_challenge))) = codes.remove(request.assertion) else {
			return Ok(IssueOutcome::Denied);
		};

		if request.verifier.is_none() {
			return Ok(IssueOutcome::Denied);
		}

		Ok(IssueOutcome::Issued(IssuedTokens::new("demo-access").with_param("expires_in", 900_u64)))
	}
}
impl CodeIssuer for MemoryCodes {
	fn issue<'a>(&'a self, request: IssueCodeRequest<'a>) -> IssueFuture<'a, TokenSecret> {
		Box::pin(self.mint(request))
	}
}
impl TokenIssuer for MemoryCodes {
	fn issue<'a>(&'a self, request: TokenRequest<'a>) -> IssueFuture<'a, IssuedTokens> {
		Box::pin(self.redeem(request))
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let codes = Arc::new(MemoryCodes::default());
	let grant = AcdcGrant::builder(codes.clone()).build()?;
	let exchange = JwtAcdcExchange::builder(codes).context(ExchangeContext::Verifier).build();
	let request = AuthorizationRequest::from_query_pairs([
		("response_type", AcdcGrant::NAME),
		("audience", "https://server.partner.com"),
		("code_challenge", "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"),
		("code_challenge_method", "S256"),
		("state", "demo-state"),
	]);
	let client = Client::new(ClientId::new("demo-client")?).with_name("Demo Client");
	let txn = Transaction::new(client.clone(), request, AuthorizationDecision::allow())
		.with_user(User::new(UserId::new("demo-user")?))
		.with_redirect_uri("https://client.example.com/callback");
	let redirect = grant.respond(&txn, || async { Ok::<_, Error>(()) }).await?;
	let location = Url::parse(redirect.location().ok_or_else(|| eyre!("Grant did not redirect."))?)?;
	let code = location
		.query_pairs()
		.find_map(|(name, value)| (name == "code").then(|| value.into_owned()))
		.ok_or_else(|| eyre!("Redirect carries no code."))?;

	println!("Redirecting user agent to {location}.");

	let token_request = ExchangeRequest::from_form_pairs(
		client,
		[
			("grant_type", JwtAcdcExchange::GRANT_TYPE.to_owned()),
			("assertion", code),
			("code_verifier", "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_owned()),
		],
	);
	let response = exchange.respond(&token_request).await?;

	println!("Token endpoint answered {}: {}.", response.status, response.body.unwrap_or_default());

	Ok(())
}
