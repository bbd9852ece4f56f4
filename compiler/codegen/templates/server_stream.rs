async fn {{METHOD_CALL_FN}}(
    mut client: {{HANDLE}},
    mut input: {{codec}}::Decoder,
    mut out: {{codec}}::Encoder,
) -> Result<(), {{runtime}}::RunError> {
    let request = input.decode::<{{INPUT}}>()?.ok_or({{runtime}}::RunError::EmptyInput)?;
    let mut stream = client.{{RPC}}(request).await?.into_inner();
    while let Some(response) = stream.message().await? {
        out.encode(&response)?;
    }
    Ok(())
}

