// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use oauth2_acdc::{
	_preludet::*,
	auth::TokenSecret,
	grant::{AcdcGrant, CodeIssuer, GrantContext, IssueCodeRequest},
	http::HttpResponse,
	issue::{IssueFuture, IssueOutcome},
	mode::{ResponseMode, ResponseModes, ResponseParams},
	txn::{AuthorizationDecision, AuthorizationRequest, Locals, PkceDescriptor, Transaction},
};

#[derive(Clone, Copy, Debug)]
enum Reply {
	Code(&'static str),
	Deny,
	Fail,
	Panic,
}

#[derive(Clone, Debug)]
struct Seen {
	client: String,
	user: Option<String>,
	audience: Option<String>,
	pkce: PkceDescriptor,
	response: Option<AuthorizationDecision>,
	request: Option<AuthorizationRequest>,
	locals: Option<Locals>,
}

struct RecordingIssuer {
	reply: Reply,
	seen: Mutex<Vec<Seen>>,
}
impl RecordingIssuer {
	fn new(reply: Reply) -> Arc<Self> {
		Arc::new(Self { reply, seen: Mutex::new(Vec::new()) })
	}

	fn calls(&self) -> Vec<Seen> {
		self.seen.lock().clone()
	}
}
impl CodeIssuer for RecordingIssuer {
	fn issue<'a>(&'a self, request: IssueCodeRequest<'a>) -> IssueFuture<'a, TokenSecret> {
		self.seen.lock().push(Seen {
			client: request.client.id.to_string(),
			user: request.user.map(|user| user.id.to_string()),
			audience: request.audience.map(Into::into),
			pkce: request.pkce.clone(),
			response: request.response.cloned(),
			request: request.request.cloned(),
			locals: request.locals.cloned(),
		});

		let reply = self.reply;

		Box::pin(async move {
			match reply {
				Reply::Code(code) => Ok(IssueOutcome::Issued(TokenSecret::new(code))),
				Reply::Deny => Ok(IssueOutcome::Denied),
				Reply::Fail => Err(Error::application("something went wrong")),
				Reply::Panic => panic!("something went horribly wrong"),
			}
		})
	}
}

/// Renders parameters as `name=value` pairs joined by `;` in the body.
struct EchoMode;
impl ResponseMode for EchoMode {
	fn render(&self, _txn: &Transaction, params: &ResponseParams) -> Result<HttpResponse> {
		let body = params.iter().map(|(name, value)| format!("{name}={value}")).collect::<Vec<_>>();

		Ok(HttpResponse::new(200).with_body(body.join(";")))
	}
}

fn with_state(mut txn: Transaction, state: &str) -> Transaction {
	txn.req.state = Some(state.into());

	txn
}

fn denied_transaction() -> Transaction {
	let mut txn = allowed_transaction();

	txn.res = AuthorizationDecision::deny();

	txn
}

fn echo_modes() -> ResponseModes {
	ResponseModes::builder()
		.register("other", EchoMode)
		.build()
		.expect("Registry with the echo mode should build.")
}

async fn complete() -> Result<()> {
	Ok(())
}

#[tokio::test]
async fn issues_code_with_minimal_context() {
	let issuer = RecordingIssuer::new(Reply::Code("eyJ"));
	let grant = AcdcGrant::new(issuer.clone());
	let completed = AtomicBool::new(false);
	let response = grant
		.respond(&with_state(allowed_transaction(), "f1o1o1"), || async {
			completed.store(true, Ordering::SeqCst);

			Ok::<_, Error>(())
		})
		.await
		.expect("Approved transaction should redirect with a code.");

	assert_eq!(response.status, 302);
	assert_eq!(
		response.location(),
		Some("http://www.example.com/auth/callback?code=eyJ&state=f1o1o1")
	);
	assert!(completed.load(Ordering::SeqCst));

	let calls = issuer.calls();

	assert_eq!(calls.len(), 1);

	let seen = &calls[0];

	assert_eq!(seen.client, "1");
	assert_eq!(seen.user.as_deref(), Some("501"));
	assert_eq!(seen.audience.as_deref(), Some(TEST_AUDIENCE));
	assert_eq!(seen.pkce.challenge.as_deref(), Some(TEST_CODE_CHALLENGE));
	assert_eq!(seen.pkce.method.as_deref(), Some("S256"));
	assert!(seen.response.is_none());
	assert!(seen.request.is_none());
	assert!(seen.locals.is_none());
}

#[tokio::test]
async fn omits_state_when_absent() {
	let grant = AcdcGrant::new(RecordingIssuer::new(Reply::Code("eyJ")));
	let response = grant
		.respond(&allowed_transaction(), complete)
		.await
		.expect("Approved transaction should redirect with a code.");

	assert_eq!(response.location(), Some("http://www.example.com/auth/callback?code=eyJ"));
}

#[tokio::test]
async fn context_levels_deliver_growing_arguments() {
	let mut txn = allowed_transaction().with_local("service", "acme");

	txn.res = AuthorizationDecision::allow().with_scope("profile");
	txn.req.extensions.insert("foo".into(), "bar".into());

	for context in [GrantContext::Response, GrantContext::Request, GrantContext::Locals] {
		let issuer = RecordingIssuer::new(Reply::Code("eyJ"));
		let grant = AcdcGrant::builder(issuer.clone())
			.context(context)
			.build()
			.expect("Grant should build for every context level.");

		grant.respond(&txn, complete).await.expect("Approved transaction should redirect.");

		let seen = issuer.calls().remove(0);

		assert_eq!(seen.client, "1");
		assert_eq!(seen.audience.as_deref(), Some(TEST_AUDIENCE));
		assert_eq!(
			seen.response.and_then(|decision| decision.scope).as_deref(),
			Some("profile"),
			"{context:?} should always deliver the decision"
		);
		assert_eq!(
			seen.request.as_ref().and_then(|request| request.extensions.get("foo")),
			(context >= GrantContext::Request).then_some(&JsonValue::from("bar")),
		);
		assert_eq!(
			seen.locals.as_ref().and_then(|locals| locals.get("service")),
			(context == GrantContext::Locals).then_some(&JsonValue::from("acme")),
		);
	}
}

#[tokio::test]
async fn denial_skips_issuer_and_completion() {
	for state in [Some("s1t2u3"), None] {
		let issuer = RecordingIssuer::new(Reply::Code("eyJ"));
		let grant = AcdcGrant::new(issuer.clone());
		let txn = match state {
			Some(state) => with_state(denied_transaction(), state),
			None => denied_transaction(),
		};
		let completed = AtomicBool::new(false);
		let response = grant
			.respond(&txn, || async {
				completed.store(true, Ordering::SeqCst);

				Ok::<_, Error>(())
			})
			.await
			.expect("Declined transaction should redirect with access_denied.");
		let expected = match state {
			Some(state) =>
				format!("http://www.example.com/auth/callback?error=access_denied&state={state}"),
			None => "http://www.example.com/auth/callback?error=access_denied".into(),
		};

		assert_eq!(response.location(), Some(expected.as_str()));
		assert!(issuer.calls().is_empty());
		assert!(!completed.load(Ordering::SeqCst));
	}
}

#[tokio::test]
async fn issuer_denial_becomes_access_denied() {
	for reply in [Reply::Deny, Reply::Code("")] {
		let grant = AcdcGrant::new(RecordingIssuer::new(reply));
		let completed = AtomicBool::new(false);
		let err = grant
			.respond(&with_state(allowed_transaction(), "f1o1o1"), || async {
				completed.store(true, Ordering::SeqCst);

				Ok::<_, Error>(())
			})
			.await
			.expect_err("Issuer denials must be forwarded as errors.");

		assert_eq!(err.to_string(), "Request denied by authorization server");
		assert_eq!(err.code(), Some("access_denied"));
		assert_eq!(err.status(), 403);
		assert!(!completed.load(Ordering::SeqCst), "{reply:?} must not complete the transaction");
	}
}

#[tokio::test]
async fn issuer_errors_and_panics_are_forwarded() {
	let err = AcdcGrant::new(RecordingIssuer::new(Reply::Fail))
		.respond(&allowed_transaction(), complete)
		.await
		.expect_err("Issuer errors must be forwarded.");

	assert!(matches!(err, Error::Application { .. }));
	assert_eq!(err.to_string(), "something went wrong");
	assert_eq!(err.code(), None);

	let err = AcdcGrant::new(RecordingIssuer::new(Reply::Panic))
		.respond(&allowed_transaction(), complete)
		.await
		.expect_err("Issuer panics must be forwarded.");

	assert!(matches!(err, Error::IssuerPanicked { .. }));
	assert_eq!(err.to_string(), "something went horribly wrong");
}

#[tokio::test]
async fn completion_failure_prevents_redirect() {
	let issuer = RecordingIssuer::new(Reply::Code("eyJ"));
	let err = AcdcGrant::new(issuer.clone())
		.respond(&allowed_transaction(), || async {
			Err::<(), _>(Error::application("failed to persist transaction"))
		})
		.await
		.expect_err("Completion failures must be forwarded.");

	assert_eq!(err.to_string(), "failed to persist transaction");
	assert_eq!(issuer.calls().len(), 1);
}

#[tokio::test]
async fn missing_redirect_uri_is_forwarded_before_issuing() {
	let issuer = RecordingIssuer::new(Reply::Code("eyJ"));
	let mut txn = allowed_transaction();

	txn.redirect_uri = None;

	let err = AcdcGrant::new(issuer.clone())
		.respond(&txn, complete)
		.await
		.expect_err("Transactions without a redirect URI cannot be answered.");

	assert_eq!(err.to_string(), "Unable to issue redirect for OAuth 2.0 transaction");
	assert!(issuer.calls().is_empty());
}

#[tokio::test]
async fn unparseable_redirect_uri_is_rejected_before_issuing() {
	let issuer = RecordingIssuer::new(Reply::Code("eyJ"));
	let grant = AcdcGrant::new(issuer.clone());
	let txn = allowed_transaction().with_redirect_uri("not a url");
	let completed = AtomicBool::new(false);
	let err = grant
		.respond(&txn, || async {
			completed.store(true, Ordering::SeqCst);

			Ok::<_, Error>(())
		})
		.await
		.expect_err("Unparseable redirect URIs cannot be answered.");

	assert_eq!(err.to_string(), "Redirect URI is invalid.");
	assert!(issuer.calls().is_empty());
	assert!(!completed.load(Ordering::SeqCst));

	let err = grant
		.respond_to_error(err, &txn)
		.expect_err("The error handler cannot redirect to an unparseable URI either.");

	assert_eq!(err.to_string(), "Redirect URI is invalid.");
}

#[tokio::test]
async fn unsupported_mode_fails_regardless_of_decision() {
	for txn in [allowed_transaction(), denied_transaction()] {
		let issuer = RecordingIssuer::new(Reply::Code("eyJ"));
		let mut txn = txn;

		txn.req.response_mode = Some("unsupported".into());

		let err = AcdcGrant::new(issuer.clone())
			.respond(&txn, complete)
			.await
			.expect_err("Unknown response modes must be rejected.");

		assert_eq!(err.to_string(), "Unsupported response mode: unsupported");
		assert_eq!(err.code(), Some("unsupported_response_mode"));
		assert_eq!(err.uri(), None);
		assert_eq!(err.status(), 501);
		assert!(issuer.calls().is_empty());
	}
}

#[tokio::test]
async fn custom_mode_receives_ordered_params() {
	let grant = AcdcGrant::builder(RecordingIssuer::new(Reply::Code("eyJ")))
		.modes(echo_modes())
		.build()
		.expect("Grant with custom modes should build.");
	let mut txn = with_state(allowed_transaction(), "f1o1o1");

	txn.req.response_mode = Some("other".into());

	let response = grant.respond(&txn, complete).await.expect("Custom mode should render.");

	assert_eq!(response.body.as_deref(), Some("code=eyJ;state=f1o1o1"));

	let mut txn = with_state(denied_transaction(), "s1t2u3");

	txn.req.response_mode = Some("other".into());

	let response = grant.respond(&txn, complete).await.expect("Custom mode should render.");

	assert_eq!(response.body.as_deref(), Some("error=access_denied;state=s1t2u3"));
}

#[tokio::test]
async fn request_parsed_from_query_pairs_drives_the_grant() {
	let request = AuthorizationRequest::from_query_pairs([
		("response_type", AcdcGrant::NAME),
		("audience", TEST_AUDIENCE),
		("code_challenge", TEST_CODE_CHALLENGE),
		("code_challenge_method", "S256"),
		("state", "f1o1o1"),
	]);
	let txn = Transaction::new(test_client(), request, AuthorizationDecision::allow())
		.with_user(test_user())
		.with_redirect_uri(TEST_REDIRECT_URI);
	let issuer = RecordingIssuer::new(Reply::Code("eyJ"));
	let response = AcdcGrant::new(issuer.clone())
		.respond(&txn, complete)
		.await
		.expect("Approved transaction should redirect with a code.");

	assert_eq!(
		response.location(),
		Some("http://www.example.com/auth/callback?code=eyJ&state=f1o1o1")
	);
	assert_eq!(issuer.calls()[0].audience.as_deref(), Some(TEST_AUDIENCE));
}
