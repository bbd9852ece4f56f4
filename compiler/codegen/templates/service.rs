/// Options shared by every `{{COMMAND}}` subcommand.
#[derive(Debug, Clone)]
pub struct {{CONFIG}} {
    pub server_addr: String,
    pub request_file: Option<{{path}}::PathBuf>,
    pub print_sample_request: bool,
    pub response_format: String,
    pub timeout: {{time}}::Duration,
    pub tls: bool,
    pub tls_server_name: Option<String>,
    pub tls_insecure_skip_verify: bool,
    pub tls_ca_cert_file: Option<{{path}}::PathBuf>,
    pub tls_cert_file: Option<{{path}}::PathBuf>,
    pub tls_key_file: Option<{{path}}::PathBuf>,
    pub auth_token: Option<String>,
    pub auth_token_type: String,
    pub jwt_key: Option<String>,
    pub jwt_key_file: Option<{{path}}::PathBuf>,
}

impl {{CONFIG}} {
    /// Flags accepted by every subcommand, each also read from the
    /// environment variable of the same name.
    pub fn args() -> Vec<{{clap}}::Arg> {
        vec![
            {{clap}}::Arg::new("server-addr")
                .short('s')
                .long("server-addr")
                .env("SERVER_ADDR")
                .default_value("{{DEFAULT_SERVER_ADDR}}")
                .help("address of the grpc server"),
            {{clap}}::Arg::new("request-file")
                .short('f')
                .long("request-file")
                .env("REQUEST_FILE")
                .value_parser({{clap}}::builder::PathBufValueParser::new())
                .help("client request file (must be json, yaml, or xml); use \"-\" for stdin + json"),
            {{clap}}::Arg::new("print-sample-request")
                .short('p')
                .long("print-sample-request")
                .env("PRINT_SAMPLE_REQUEST")
                .action({{clap}}::ArgAction::SetTrue)
                .help("print a sample request file in the response format"),
            {{clap}}::Arg::new("response-format")
                .short('o')
                .long("response-format")
                .env("RESPONSE_FORMAT")
                .default_value("json")
                .help("response format (json, prettyjson, yaml, or xml)"),
            {{clap}}::Arg::new("timeout")
                .long("timeout")
                .env("TIMEOUT")
                .default_value("10s")
                .value_parser({{env}}::parse_duration)
                .help("client connection timeout"),
            {{clap}}::Arg::new("tls")
                .long("tls")
                .env("TLS")
                .action({{clap}}::ArgAction::SetTrue)
                .help("enable tls"),
            {{clap}}::Arg::new("tls-server-name")
                .long("tls-server-name")
                .env("TLS_SERVER_NAME")
                .help("tls server name override"),
            {{clap}}::Arg::new("tls-insecure-skip-verify")
                .long("tls-insecure-skip-verify")
                .env("TLS_INSECURE_SKIP_VERIFY")
                .action({{clap}}::ArgAction::SetTrue)
                .help("INSECURE: skip tls checks"),
            {{clap}}::Arg::new("tls-ca-cert-file")
                .long("tls-ca-cert-file")
                .env("TLS_CA_CERT_FILE")
                .value_parser({{clap}}::builder::PathBufValueParser::new())
                .help("ca certificate file"),
            {{clap}}::Arg::new("tls-cert-file")
                .long("tls-cert-file")
                .env("TLS_CERT_FILE")
                .value_parser({{clap}}::builder::PathBufValueParser::new())
                .help("client certificate file"),
            {{clap}}::Arg::new("tls-key-file")
                .long("tls-key-file")
                .env("TLS_KEY_FILE")
                .value_parser({{clap}}::builder::PathBufValueParser::new())
                .help("client key file"),
            {{clap}}::Arg::new("auth-token")
                .long("auth-token")
                .env("AUTH_TOKEN")
                .help("authorization token"),
            {{clap}}::Arg::new("auth-token-type")
                .long("auth-token-type")
                .env("AUTH_TOKEN_TYPE")
                .default_value("Bearer")
                .help("authorization token type"),
            {{clap}}::Arg::new("jwt-key")
                .long("jwt-key")
                .env("JWT_KEY")
                .help("service account json key used to sign a jwt"),
            {{clap}}::Arg::new("jwt-key-file")
                .long("jwt-key-file")
                .env("JWT_KEY_FILE")
                .value_parser({{clap}}::builder::PathBufValueParser::new())
                .help("service account json key file used to sign a jwt"),
        ]
    }

    /// Read the options back from parsed arguments.
    pub fn from_matches(matches: &{{clap}}::ArgMatches) -> Self {
        let string = |id: &str| matches.get_one::<String>(id).cloned();
        let path = |id: &str| matches.get_one::<{{path}}::PathBuf>(id).cloned();
        Self {
            server_addr: string("server-addr").unwrap_or_default(),
            request_file: path("request-file"),
            print_sample_request: matches.get_flag("print-sample-request"),
            response_format: string("response-format").unwrap_or_default(),
            timeout: matches
                .get_one::<{{time}}::Duration>("timeout")
                .copied()
                .unwrap_or({{runtime}}::connect::DEFAULT_TIMEOUT),
            tls: matches.get_flag("tls"),
            tls_server_name: string("tls-server-name"),
            tls_insecure_skip_verify: matches.get_flag("tls-insecure-skip-verify"),
            tls_ca_cert_file: path("tls-ca-cert-file"),
            tls_cert_file: path("tls-cert-file"),
            tls_key_file: path("tls-key-file"),
            auth_token: string("auth-token"),
            auth_token_type: string("auth-token-type").unwrap_or_default(),
            jwt_key: string("jwt-key"),
            jwt_key_file: path("jwt-key-file"),
        }
    }

    pub fn connect_options(&self) -> {{runtime}}::connect::ConnectOptions {
        {{runtime}}::connect::ConnectOptions {
            server_addr: self.server_addr.clone(),
            timeout: self.timeout,
            tls: self.tls,
            server_name: self.tls_server_name.clone(),
            insecure_skip_verify: self.tls_insecure_skip_verify,
            ca_cert_file: self.tls_ca_cert_file.clone(),
            cert_file: self.tls_cert_file.clone(),
            key_file: self.tls_key_file.clone(),
        }
    }

    pub fn auth_interceptor(&self) -> Result<{{auth}}::AuthInterceptor, {{runtime}}::RunError> {
        let options = {{auth}}::AuthOptions {
            auth_token: self.auth_token.clone(),
            auth_token_type: self.auth_token_type.clone(),
            jwt_key: self.jwt_key.clone(),
            jwt_key_file: self.jwt_key_file.clone(),
            audience: {{auth}}::service_audience(&self.server_addr, "{{SERVICE_PATH}}"),
        };
        options.interceptor(self.tls)
    }
}

/// `{{COMMAND}}`: one subcommand per `{{SERVICE}}` method.
pub fn {{COMMAND_FN}}() -> {{clap}}::Command {
    {{clap}}::Command::new("{{COMMAND}}")
        .about("{{SERVICE}} client")
        .long_about("{{SERVICE}} client\n\nYou can use environment variables with the same name of the command flags.\nAll caps and s/-/_, e.g. SERVER_ADDR.")
        .subcommand_required(true)
        .arg_required_else_help(true)
{{SUBCOMMANDS}}}

/// Run the `{{COMMAND}}` subcommand selected in `matches`.
///
/// Prints the error and exits with status 1 if the call fails.
pub fn {{RUN_FN}}(matches: &{{clap}}::ArgMatches) {
    let result = match matches.subcommand() {
{{DISPATCH}}        Some((other, _)) => Err({{runtime}}::RunError::Config(format!("unknown command '{other}'"))),
        None => Err({{runtime}}::RunError::Config("no command given".to_string())),
    };
    if let Err(err) = result {
        eprintln!("{err}");
        ::std::process::exit(1);
    }
}

/// Client type every `{{SERVICE}}` call goes through.
pub type {{HANDLE}} = {{CLIENT_MODULE}}::{{CLIENT}}<
    {{tonic}}::service::interceptor::InterceptedService<{{transport}}::Channel, {{auth}}::AuthInterceptor>,
>;

async fn {{DIAL_FN}}(cfg: &{{CONFIG}}) -> Result<{{HANDLE}}, {{runtime}}::RunError> {
    let interceptor = cfg.auth_interceptor()?;
    let channel = cfg.connect_options().connect().await?;
    Ok({{CLIENT_MODULE}}::{{CLIENT}}::with_interceptor(channel, interceptor))
}

fn {{ROUND_TRIP_FN}}<T, F, Fut>(cfg: &{{CONFIG}}, sample: &T, call: F) -> Result<(), {{runtime}}::RunError>
where
    T: {{codec}}::Serialize,
    F: FnOnce({{HANDLE}}, {{codec}}::Decoder, {{codec}}::Encoder) -> Fut,
    Fut: ::core::future::Future<Output = Result<(), {{runtime}}::RunError>>,
{
    let registry = {{codec}}::CodecRegistry::new();
    let format = if cfg.response_format.is_empty() { "json" } else { cfg.response_format.as_str() };
    let mut out = registry.encoder(format, Box::new({{io}}::stdout()))?;
    if cfg.print_sample_request {
        out.encode(sample)?;
        return Ok(());
    }

    let input = match cfg.request_file.as_deref() {
        Some(path) if !path.as_os_str().is_empty() && path.as_os_str() != "-" => {
            let format = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
            let file = {{fs}}::File::open(path)
                .map_err(|source| {{runtime}}::RunError::RequestFile { path: path.to_path_buf(), source })?;
            registry.decoder(format, Box::new({{io}}::BufReader::new(file)))?
        }
        _ => registry.decoder("json", Box::new({{io}}::BufReader::new({{io}}::stdin())))?,
    };

    {{runtime}}::block_on(async move {
        let client = {{DIAL_FN}}(cfg).await?;
        call(client, input, out).await
    })
}

