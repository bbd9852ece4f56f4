async fn {{METHOD_CALL_FN}}(
    mut client: {{HANDLE}},
    input: {{codec}}::Decoder,
    mut out: {{codec}}::Encoder,
) -> Result<(), {{runtime}}::RunError> {
    let (requests, failure) = {{codec}}::RequestStream::<{{INPUT}}>::new(input);
    let response = failure.guard(client.{{RPC}}(requests)).await?;
    out.encode(response.get_ref())?;
    Ok(())
}

