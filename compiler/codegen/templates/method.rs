/// `{{COMMAND}} {{METHOD_COMMAND}}`: {{SHAPE}} call to `{{SERVICE}}.{{METHOD}}`.
pub fn {{METHOD_COMMAND_FN}}() -> {{clap}}::Command {
    {{clap}}::Command::new("{{METHOD_COMMAND}}")
        .about("Call {{SERVICE}}.{{METHOD}}")
        .long_about("{{METHOD}} client\n\nYou can use environment variables with the same name of the command flags.\nAll caps and s/-/_, e.g. SERVER_ADDR.")
        .after_help("Examples:\n\nSave a sample request to a file (or refer to your protobuf descriptor to create one):\n\t{{COMMAND}} {{METHOD_COMMAND}} -p > req.json\n\nSubmit request using file:\n\t{{COMMAND}} {{METHOD_COMMAND}} -f req.json\n\nAuthenticate using the Authorization header (requires transport security):\n\texport AUTH_TOKEN=your_access_token\n\texport SERVER_ADDR=api.example.com:443\n\techo '{json}' | {{COMMAND}} {{METHOD_COMMAND}} --tls")
        .args({{CONFIG}}::args())
}

fn {{METHOD_RUN_FN}}(cfg: &{{CONFIG}}) -> Result<(), {{runtime}}::RunError> {
    let sample = <{{INPUT}} as ::core::default::Default>::default();
    {{ROUND_TRIP_FN}}(cfg, &sample, {{METHOD_CALL_FN}})
}

