use isahc::{Request, prelude::AsyncReadResponseExt};

use crate::{Error, config::Api};

use super::{
    address::Address,
    http_client::HttpClient,
    parser::{IpifyParser, ResponseParser},
    state::{LookupResult, Outcome},
};

pub trait Geolocate {
    async fn locate(&self, address: &Address) -> Outcome;
}

pub struct GeolocationClient<P = IpifyParser> {
    client: HttpClient,
    endpoint: String,
    key: String,
    parser: P,
}

impl GeolocationClient<IpifyParser> {
    pub fn from_config(api: &Api) -> Result<Self, Error> {
        Ok(Self::new(
            HttpClient::new()?,
            api.endpoint.clone(),
            api.key.clone(),
            IpifyParser,
        ))
    }
}

impl<P> GeolocationClient<P> {
    pub(crate) fn new(client: HttpClient, endpoint: String, key: String, parser: P) -> Self {
        Self {
            client,
            endpoint,
            key,
            parser,
        }
    }

    fn url(&self, address: &Address) -> String {
        format!(
            "{endpoint}?apiKey={key}&ipAddress={address}",
            endpoint = self.endpoint,
            key = self.key,
            address = address.as_str(),
        )
    }
}

impl<P> GeolocationClient<P>
where
    P: ResponseParser,
{
    pub async fn fetch(&self, address: &Address) -> Result<LookupResult, Error> {
        let request = Request::get(self.url(address)).body(())?;
        let mut response = self.client.send_async(request).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("geolocation response for {}: {}", address, status);
        self.parser.parse(status, &body)
    }
}

impl<P> Geolocate for GeolocationClient<P>
where
    P: ResponseParser,
{
    async fn locate(&self, address: &Address) -> Outcome {
        match self.fetch(address).await {
            Ok(result) => {
                info!(
                    ip = %result.ip,
                    region = %result.region,
                    "located {}", address
                );
                Outcome::Located(result)
            }
            Err(err) => {
                error!(
                    code = err.code(),
                    status = ?err.status(),
                    "lookup of {} failed: {}", address, err
                );
                Outcome::Failed(err.user_message())
            }
        }
    }
}
