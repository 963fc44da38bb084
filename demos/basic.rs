use watson_http::{ClientOptions, Method, ServiceClient, WatsonError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = ServiceClient::from_env()?.with_options(
        ClientOptions::default().with_header("X-Watson-Learning-Opt-Out", "true"),
    );

    let request = client
        .request(Method::GET, "v3/classifiers")
        .query(&[("verbose", "true")]);

    match client.send_json::<serde_json::Value>(request).await {
        Ok(classifiers) => println!("{classifiers:#}"),
        Err(WatsonError::Http(err)) => {
            eprintln!("{err}");
            if let Some(metadata) = &err.metadata {
                eprintln!("metadata: {}", serde_json::Value::Object(metadata.clone()));
            }
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
