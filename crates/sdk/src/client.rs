//! ReadsUtils Client Implementation

use crate::config::{ClientConfig, Credentials};
use crate::error::{Result, SdkError};
use readsutils_core::domain::{
    ConvertReadLibraryOutput, ConvertReadLibraryParams, DownloadReadsOutput, DownloadReadsParams,
    ExportOutput, ExportParams, ServiceStatus, UploadReadsOutput, UploadReadsParams,
    UploadStagingParams, UploadWebParams, ValidateFastqOutput, ValidateFastqParams,
};
use readsutils_core::envelope::decode_response;
use readsutils_core::port::id_provider::UuidProvider;
use readsutils_core::port::{
    Authorization, HttpRequest, IdProvider, RequestBody, RpcTransport, TransportOptions,
};
use readsutils_core::{RequestEnvelope, RpcContext};
use readsutils_infra_http::HttpTransport;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// ReadsUtils Client
///
/// One async method per remote function. Each call is a single HTTP
/// exchange; nothing is retried or cached.
///
/// # Example
///
/// ```no_run
/// use readsutils_sdk::{ClientConfig, ReadsUtilsClient};
/// use readsutils_sdk::domain::DownloadReadsParams;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new("https://kbase.us/services/ReadsUtils")?.with_token("TOKEN");
/// let client = ReadsUtilsClient::connect(config).await?;
///
/// let out = client
///     .download_reads(&DownloadReadsParams::new(["1/2/3"]), None)
///     .await?;
/// println!("{:?}", out.files);
/// # Ok(())
/// # }
/// ```
pub struct ReadsUtilsClient {
    config: ClientConfig,
    transport: Arc<dyn RpcTransport>,
    ids: Arc<dyn IdProvider>,
}

impl ReadsUtilsClient {
    /// Client over the default HTTP transport; no login exchange is attempted
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()), Arc::new(UuidProvider))
    }

    /// Build a client, trading user/password for a token when an auth URL is configured
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let mut client = Self::new(config);
        client.login().await?;
        Ok(client)
    }

    /// Client over an arbitrary transport (tests, custom adapters)
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn RpcTransport>,
        ids: Arc<dyn IdProvider>,
    ) -> Self {
        Self {
            config,
            transport,
            ids,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Mutable access to timeouts, TLS trust, streaming and the version pin
    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    /// Current auth token, if the client holds one
    pub fn token(&self) -> Option<&str> {
        match self.config.credentials() {
            Some(Credentials::Token(token)) => Some(token),
            _ => None,
        }
    }

    /// Exchange user/password for a token at the configured auth URL.
    ///
    /// No-op unless both a password credential and an auth URL are set.
    pub async fn login(&mut self) -> Result<()> {
        let (user, password) = match self.config.credentials() {
            Some(Credentials::Password { user, password }) => (user.clone(), password.clone()),
            _ => return Ok(()),
        };
        let auth_url = match self.config.auth_url() {
            Some(url) => url.clone(),
            None => return Ok(()),
        };

        if auth_url.scheme() != "https" && !self.config.is_insecure_http_allowed() {
            return Err(SdkError::Unauthorized(
                "Refusing to send a password to an insecure http auth service".to_string(),
            ));
        }

        tracing::debug!(user = %user, auth_url = %auth_url, "Logging in");
        let response = self
            .transport
            .post(HttpRequest {
                url: auth_url.to_string(),
                authorization: None,
                body: RequestBody::Form(vec![
                    ("user_id".to_string(), user),
                    ("password".to_string(), password),
                    ("fields".to_string(), "token".to_string()),
                ]),
                options: self.config.transport_options(),
            })
            .await?;

        let token = parse_login_reply(response.status, &response.body)?;
        self.config.set_credentials(Credentials::Token(token));
        tracing::info!("Login succeeded");
        Ok(())
    }

    // ========================================================================
    // Remote functions
    // ========================================================================

    /// Validate that one or more files are FASTQ files.
    ///
    /// Only checks the file extension when run against the service; the
    /// outputs are positional with respect to `params`.
    pub async fn validate_fastq(
        &self,
        params: &[ValidateFastqParams],
        context: Option<RpcContext>,
    ) -> Result<Vec<ValidateFastqOutput>> {
        self.call("validateFASTQ", vec![to_param(params)?], context, true)
            .await
    }

    /// Load FASTQ files (from shock nodes or the service's scratch space) as a reads object
    pub async fn upload_reads(
        &self,
        params: &UploadReadsParams,
        context: Option<RpcContext>,
    ) -> Result<UploadReadsOutput> {
        self.call("upload_reads", vec![to_param(params)?], context, true)
            .await
    }

    /// Download read libraries, optionally (de)interleaving them
    pub async fn download_reads(
        &self,
        params: &DownloadReadsParams,
        context: Option<RpcContext>,
    ) -> Result<DownloadReadsOutput> {
        self.call("download_reads", vec![to_param(params)?], context, true)
            .await
    }

    /// Export a read library as a shock archive
    pub async fn export_reads(
        &self,
        params: &ExportParams,
        context: Option<RpcContext>,
    ) -> Result<ExportOutput> {
        self.call("export_reads", vec![to_param(params)?], context, true)
            .await
    }

    pub async fn upload_reads_from_staging_area(
        &self,
        params: &UploadStagingParams,
        context: Option<RpcContext>,
    ) -> Result<UploadReadsOutput> {
        self.call(
            "upload_reads_from_staging_area",
            vec![to_param(params)?],
            context,
            true,
        )
        .await
    }

    pub async fn upload_reads_from_web(
        &self,
        params: &UploadWebParams,
        context: Option<RpcContext>,
    ) -> Result<UploadReadsOutput> {
        self.call("upload_reads_from_web", vec![to_param(params)?], context, true)
            .await
    }

    /// Write read libraries to local files, optionally gzipped
    pub async fn convert_read_library_to_file(
        &self,
        params: &ConvertReadLibraryParams,
        context: Option<RpcContext>,
    ) -> Result<ConvertReadLibraryOutput> {
        self.call(
            "convert_read_library_to_file",
            vec![to_param(params)?],
            context,
            true,
        )
        .await
    }

    /// Service health; the only function callable without credentials.
    ///
    /// Over plain http without insecure http allowed, configured credentials
    /// are withheld and the call is sent anonymously.
    pub async fn status(&self, context: Option<RpcContext>) -> Result<ServiceStatus> {
        self.call("status", Vec::new(), context, false).await
    }

    // ========================================================================
    // Call envelope
    // ========================================================================

    async fn call<R: DeserializeOwned>(
        &self,
        function: &str,
        params: Vec<Value>,
        context: Option<RpcContext>,
        auth_required: bool,
    ) -> Result<R> {
        let authorization = self.authorization(function, auth_required)?;

        let envelope = RequestEnvelope::new(function, params, self.ids.generate_id())
            .with_context(context, self.config.service_version());
        let method = envelope.method.clone();
        let id = envelope.id.clone();

        let body = if self.config.is_streaming_mode() {
            RequestBody::JsonStream(envelope)
        } else {
            RequestBody::Json(envelope.to_bytes()?)
        };

        tracing::debug!(
            method = %method,
            id = %id,
            streaming = self.config.is_streaming_mode(),
            authenticated = authorization.is_some(),
            "Dispatching call"
        );

        let request = HttpRequest {
            url: self.config.url().to_string(),
            authorization,
            body,
            options: self.transport_options(),
        };

        let response = self.transport.post(request).await.map_err(|e| {
            tracing::warn!(method = %method, id = %id, error = %e, "Transport failure");
            SdkError::from(e)
        })?;

        decode_response(response.status, &response.body).map_err(|e| {
            let e = SdkError::from(e);
            tracing::warn!(method = %method, id = %id, error = %e, "Call failed");
            e
        })
    }

    fn authorization(&self, function: &str, auth_required: bool) -> Result<Option<Authorization>> {
        let insecure = !self.config.is_secure() && !self.config.is_insecure_http_allowed();

        match self.config.credentials() {
            Some(_) if insecure && auth_required => Err(SdkError::Unauthorized(format!(
                "{} requires authentication, which is not sent over insecure http",
                function
            ))),
            // Optional auth over plain http: call anonymously
            Some(_) if insecure => Ok(None),
            Some(credentials) => Ok(Some(credentials.authorization())),
            None if auth_required => Err(SdkError::Unauthorized(format!(
                "{} requires authentication but no credentials are configured",
                function
            ))),
            None => Ok(None),
        }
    }

    fn transport_options(&self) -> TransportOptions {
        self.config.transport_options()
    }
}

fn to_param<T: Serialize + ?Sized>(params: &T) -> Result<Value> {
    Ok(serde_json::to_value(params)?)
}

fn parse_login_reply(status: u16, body: &[u8]) -> Result<String> {
    let reply: Value = serde_json::from_slice(body).map_err(|_| {
        SdkError::Unauthorized(format!("Login failed with HTTP status {}", status))
    })?;

    if !(200..300).contains(&status) {
        let reason = reply
            .get("error_msg")
            .or_else(|| reply.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("no reason given");
        return Err(SdkError::Unauthorized(format!(
            "Login failed with HTTP status {}: {}",
            status, reason
        )));
    }

    reply
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SdkError::Unauthorized("Login reply carried no token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use readsutils_core::domain::Tern;
    use readsutils_core::port::id_provider::SequentialIdProvider;
    use readsutils_core::port::transport::mocks::MockTransport;
    use readsutils_core::port::TransportError;
    use serde_json::json;
    use std::time::Duration;
    use tokio_test::assert_err;

    const URL: &str = "https://kbase.us/services/ReadsUtils";

    fn client(config: ClientConfig, mock: &MockTransport) -> ReadsUtilsClient {
        ReadsUtilsClient::with_transport(
            config,
            Arc::new(mock.clone()),
            Arc::new(SequentialIdProvider::default()),
        )
    }

    fn authed() -> ClientConfig {
        ClientConfig::new(URL).unwrap().with_token("tok")
    }

    #[tokio::test]
    async fn test_status_sends_empty_params_without_auth() {
        let mock = MockTransport::new().reply_json(
            200,
            &json!({"result": [{"state": "OK", "version": "1.0.9", "git_url": "https://x"}]}),
        );
        let c = client(ClientConfig::new(URL).unwrap(), &mock);

        let status = tokio_test::assert_ok!(c.status(None).await);
        assert!(status.is_ok());
        assert_eq!(status.version.as_deref(), Some("1.0.9"));

        let sent = &mock.requests()[0];
        assert_eq!(sent.url, URL);
        assert!(sent.authorization.is_none());
        assert_eq!(
            sent.json.as_ref().unwrap(),
            &json!({"method": "ReadsUtils.status", "params": [], "version": "1.1", "id": "1"})
        );
    }

    #[tokio::test]
    async fn test_fault_surfaces_as_rpc_error() {
        let mock = MockTransport::new().reply_json(
            500,
            &json!({"version": "1.1", "error": {"name": "JSONRPCError", "code": -1, "message": "boom", "error": "Traceback..."}}),
        );
        let c = client(authed(), &mock);

        let err = c
            .export_reads(&ExportParams::new("1/2/3"), None)
            .await
            .unwrap_err();
        let fault = err.fault().expect("rpc fault");
        assert_eq!(fault.code, -1);
        assert_eq!(fault.message, "boom");
        assert_eq!(fault.trace.as_deref(), Some("Traceback..."));
    }

    #[tokio::test]
    async fn test_convert_with_empty_files_and_unset_flags() {
        let mock = MockTransport::new().reply_json(200, &json!({"result": [{"files": {}}]}));
        let c = client(authed(), &mock);

        let params = ConvertReadLibraryParams::new(["ws/obj1"]);
        let out = c.convert_read_library_to_file(&params, None).await.unwrap();
        assert_eq!(out.files.map(|f| f.len()), Some(0));

        let sent = mock.requests()[0].json.clone().unwrap();
        assert_eq!(sent["method"], "ReadsUtils.convert_read_library_to_file");
        assert_eq!(sent["params"], json!([{"read_libraries": ["ws/obj1"]}]));
    }

    #[tokio::test]
    async fn test_download_sends_tern_as_string() {
        let mock = MockTransport::new().reply_json(200, &json!({"result": [{"files": {}}]}));
        let c = client(authed(), &mock);

        let params = DownloadReadsParams {
            interleaved: Some(Tern::False),
            ..DownloadReadsParams::new(["1/2/3"])
        };
        c.download_reads(&params, None).await.unwrap();

        let sent = mock.requests()[0].json.clone().unwrap();
        assert_eq!(sent["params"][0]["interleaved"], "false");
    }

    #[tokio::test]
    async fn test_validate_fastq_wraps_list() {
        let mock = MockTransport::new()
            .reply_json(200, &json!({"result": [[{"validated": 1}, {"validated": 0}]]}));
        let c = client(authed(), &mock);

        let params = vec![
            ValidateFastqParams::new("/tmp/a.fq"),
            ValidateFastqParams::new("/tmp/b.txt"),
        ];
        let out = c.validate_fastq(&params, None).await.unwrap();
        assert_eq!(out.len(), 2);
        assert!(out[0].is_valid());
        assert!(!out[1].is_valid());

        let sent = mock.requests()[0].json.clone().unwrap();
        assert_eq!(sent["method"], "ReadsUtils.validateFASTQ");
        assert_eq!(sent["params"][0][1]["file_path"], "/tmp/b.txt");
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_network() {
        let mock = MockTransport::new();
        let c = client(ClientConfig::new(URL).unwrap(), &mock);

        let err = assert_err!(c.upload_reads(&UploadReadsParams::default(), None).await);
        assert!(matches!(err, SdkError::Unauthorized(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_credentials_not_sent_over_plain_http() {
        let mock = MockTransport::new().reply_json(200, &json!({"result": [{"state": "OK"}]}));
        let config = ClientConfig::new("http://localhost:5000")
            .unwrap()
            .with_token("tok");
        let c = client(config, &mock);

        let err = c
            .export_reads(&ExportParams::new("1/2/3"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Unauthorized(_)));
        assert_eq!(mock.call_count(), 0);

        // status still goes through, anonymously
        c.status(None).await.unwrap();
        assert!(mock.requests()[0].authorization.is_none());
    }

    #[tokio::test]
    async fn test_insecure_http_allowed_sends_token() {
        let mock = MockTransport::new().reply_json(200, &json!({"result": [{"shock_id": "n1"}]}));
        let mut config = ClientConfig::new("http://localhost:5000")
            .unwrap()
            .with_token("tok");
        config.set_insecure_http_allowed(true);
        let c = client(config, &mock);

        let out = c
            .export_reads(&ExportParams::new("1/2/3"), None)
            .await
            .unwrap();
        assert_eq!(out.shock_id.as_deref(), Some("n1"));
        assert_eq!(
            mock.requests()[0].authorization,
            Some(Authorization::Token("tok".to_string()))
        );
    }

    #[tokio::test]
    async fn test_basic_auth_without_auth_url() {
        let mock = MockTransport::new().reply_json(200, &json!({"result": [{"obj_ref": "1/2/3"}]}));
        let config = ClientConfig::new(URL)
            .unwrap()
            .with_basic_auth("alice", "pw");
        let c = ReadsUtilsClient::with_transport(
            config,
            Arc::new(mock.clone()),
            Arc::new(SequentialIdProvider::default()),
        );

        c.upload_reads_from_staging_area(&UploadStagingParams::default(), None)
            .await
            .unwrap();
        assert_eq!(
            mock.requests()[0].authorization,
            Some(Authorization::Basic {
                user: "alice".to_string(),
                password: "pw".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_login_exchanges_password_for_token() {
        let mock = MockTransport::new()
            .reply_json(200, &json!({"user_id": "alice", "token": "fresh"}))
            .reply_json(200, &json!({"result": [{"obj_ref": "1/2/3"}]}));
        let config = ClientConfig::new(URL)
            .unwrap()
            .with_basic_auth("alice", "pw")
            .with_auth_url("https://kbase.us/services/authorization/Sessions/Login")
            .unwrap();
        let mut c = client(config, &mock);

        c.login().await.unwrap();
        assert_eq!(c.token(), Some("fresh"));

        c.upload_reads_from_web(&UploadWebParams::default(), None)
            .await
            .unwrap();

        let requests = mock.requests();
        let form = requests[0].form.clone().unwrap();
        assert!(form.contains(&("user_id".to_string(), "alice".to_string())));
        assert!(form.contains(&("fields".to_string(), "token".to_string())));
        assert_eq!(
            requests[1].authorization,
            Some(Authorization::Token("fresh".to_string()))
        );
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mock = MockTransport::new()
            .reply_json(401, &json!({"error_msg": "LoginFailure: Authentication failed."}));
        let config = ClientConfig::new(URL)
            .unwrap()
            .with_basic_auth("alice", "wrong")
            .with_auth_url("https://kbase.us/services/authorization/Sessions/Login")
            .unwrap();
        let mut c = client(config, &mock);

        let err = c.login().await.unwrap_err();
        assert!(matches!(err, SdkError::Unauthorized(ref m) if m.contains("Authentication failed")));
        assert_eq!(c.token(), None);
    }

    #[tokio::test]
    async fn test_streaming_and_options_reach_transport() {
        let mock = MockTransport::new().reply_json(200, &json!({"result": [{"obj_ref": "1/2/3"}]}));
        let mut c = client(authed(), &mock);
        c.config_mut().set_streaming_mode(true);
        c.config_mut().set_read_timeout(Some(0));
        c.config_mut().set_all_certs_trusted(true);

        c.upload_reads(&UploadReadsParams::default(), None)
            .await
            .unwrap();

        let sent = &mock.requests()[0];
        assert!(sent.streamed);
        assert_eq!(sent.options.read_timeout, None);
        assert!(sent.options.trust_all_certs);

        c.config_mut().set_streaming_mode(false);
        c.config_mut().set_read_timeout(Some(2000));
        let _ = c.upload_reads(&UploadReadsParams::default(), None).await;
        let sent = &mock.requests()[1];
        assert!(!sent.streamed);
        assert_eq!(sent.options.read_timeout, Some(Duration::from_millis(2000)));
    }

    #[tokio::test]
    async fn test_service_version_pin_in_context() {
        let mock = MockTransport::new()
            .reply_json(200, &json!({"result": [{"state": "OK"}]}))
            .reply_json(200, &json!({"result": [{"state": "OK"}]}));
        let mut c = client(ClientConfig::new(URL).unwrap(), &mock);
        c.config_mut().set_service_version(Some("dev".to_string()));

        c.status(None).await.unwrap();
        let context = RpcContext {
            run_id: Some("run-7".to_string()),
            ..Default::default()
        };
        c.status(Some(context)).await.unwrap();

        let requests = mock.requests();
        assert_eq!(
            requests[0].json.as_ref().unwrap()["context"],
            json!({"service_ver": "dev"})
        );
        let second = requests[1].json.as_ref().unwrap();
        assert_eq!(second["context"]["run_id"], "run-7");
        assert_eq!(second["context"]["service_ver"], "dev");
        assert_eq!(second["id"], "2");
    }

    #[tokio::test]
    async fn test_transport_and_decode_failures() {
        let mock = MockTransport::new()
            .fail(TransportError::Timeout("read timed out".to_string()))
            .reply(502, "<html>Bad Gateway</html>")
            .reply_json(200, &json!({"result": []}));
        let c = client(authed(), &mock);
        let params = ExportParams::new("1/2/3");

        assert!(matches!(
            c.export_reads(&params, None).await,
            Err(SdkError::Transport(TransportError::Timeout(_)))
        ));
        assert!(matches!(
            c.export_reads(&params, None).await,
            Err(SdkError::Transport(TransportError::Status { status: 502, .. }))
        ));
        assert!(matches!(
            c.export_reads(&params, None).await,
            Err(SdkError::Decode(_))
        ));
    }
}
