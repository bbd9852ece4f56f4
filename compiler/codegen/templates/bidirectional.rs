async fn {{METHOD_CALL_FN}}(
    mut client: {{HANDLE}},
    mut input: {{codec}}::Decoder,
    mut out: {{codec}}::Encoder,
) -> Result<(), {{runtime}}::RunError> {
    let requests = input.decode_all::<{{INPUT}}>()?;
    let (requests, sent) = {{codec}}::send_all(requests);
    let mut stream = client.{{RPC}}(requests).await?.into_inner();
    sent.await;
    while let Some(response) = stream.message().await? {
        out.encode(&response)?;
    }
    Ok(())
}

