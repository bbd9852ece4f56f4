async fn {{METHOD_CALL_FN}}(
    mut client: {{HANDLE}},
    mut input: {{codec}}::Decoder,
    mut out: {{codec}}::Encoder,
) -> Result<(), {{runtime}}::RunError> {
    let request = input.decode::<{{INPUT}}>()?.ok_or({{runtime}}::RunError::EmptyInput)?;
    let response = client.{{RPC}}(request).await?;
    out.encode(response.get_ref())?;
    Ok(())
}

