//! Verification through the Etherscan contract API

use std::time::Duration;

use alloy::{hex, primitives::Address};
use json::JsonValue;
use reqwest::{Client, RequestBuilder};
use tokio::time::sleep;
use tracing::info;

use crate::{
    artifacts::ArtifactStore,
    constants::{MAX_VERIFICATION_POLLS, SOLIDITY_STANDARD_JSON_INPUT, VERIFICATION_POLL_INTERVAL},
    contracts::CryptoDevsContract,
    errors::ScriptError,
    tx::abi::encode_constructor_args,
    verify::ContractVerifier,
};

/// Status of a submitted verification, as reported by `checkverifystatus`
#[derive(Debug, PartialEq, Eq)]
enum VerificationStatus {
    /// Still queued or being processed
    Pending,
    /// Source matched the deployed bytecode
    Verified,
    /// Rejected, with the reason given by the explorer
    Failed(String),
}

impl VerificationStatus {
    /// Classify the `result` field of a status answer
    fn from_result(result: &str) -> Self {
        if result == "Pending in queue" || result.starts_with("In progress") {
            VerificationStatus::Pending
        } else if result.starts_with("Pass") {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Failed(result.to_string())
        }
    }
}

/// Client of an Etherscan compatible verification API
pub struct EtherscanVerifier {
    /// HTTP client used for every call
    client: Client,
    /// Endpoint of the API
    api_url: String,
    /// Our API key
    api_key: String,
    /// Chain the contracts live on, sent as `chainid`
    chain_id: u64,
    /// Where the sources and compiler settings are read from
    artifacts: ArtifactStore,
    /// Delay before each status check
    poll_interval: Duration,
    /// Status checks before giving up
    max_polls: u32,
}

impl EtherscanVerifier {
    /// Verifier for contracts on `chain_id`, polling with the default settings
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        chain_id: u64,
        artifacts: ArtifactStore,
    ) -> Self {
        EtherscanVerifier {
            client: Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            chain_id,
            artifacts,
            poll_interval: VERIFICATION_POLL_INTERVAL,
            max_polls: MAX_VERIFICATION_POLLS,
        }
    }

    /// Override how the verification status is polled
    pub fn with_polling(mut self, poll_interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_polls = max_polls;
        self
    }

    /// Submit the sources of `contract`, returning the GUID of the verification request
    async fn submit(
        &self,
        contract: CryptoDevsContract,
        address: Address,
        constructor_args: &[Address],
    ) -> Result<String, ScriptError> {
        let artifact = self.artifacts.load_artifact(contract.artifact_name())?;
        let build_info = self.artifacts.load_build_info(&artifact)?;

        let form = vec![
            ("apikey", self.api_key.clone()),
            ("module", "contract".to_string()),
            ("action", "verifysourcecode".to_string()),
            ("contractaddress", address.to_string()),
            ("sourceCode", build_info.input.dump()),
            ("codeformat", SOLIDITY_STANDARD_JSON_INPUT.to_string()),
            ("contractname", artifact.fully_qualified_name()),
            ("compilerversion", format!("v{}", build_info.solc_long_version)),
            // The typo is part of the etherscan API
            (
                "constructorArguements",
                hex::encode(encode_constructor_args(constructor_args)),
            ),
        ];

        let request = self
            .client
            .post(&self.api_url)
            .query(&[("chainid", self.chain_id.to_string())])
            .form(&form);
        let response = self.call(request).await?;

        match response["status"].as_str() {
            Some("1") => response["result"].as_str().map(str::to_string).ok_or_else(|| {
                ScriptError::ContractVerification(String::from(
                    "verification accepted without a GUID",
                ))
            }),
            _ => Err(ScriptError::ContractVerification(format!(
                "{} submission rejected: {}",
                contract.artifact_name(),
                describe(&response)
            ))),
        }
    }

    /// Ask the explorer where the verification request `guid` stands
    async fn check_status(&self, guid: &str) -> Result<VerificationStatus, ScriptError> {
        let request = self.client.get(&self.api_url).query(&[
            ("chainid", self.chain_id.to_string()),
            ("apikey", self.api_key.clone()),
            ("module", "contract".to_string()),
            ("action", "checkverifystatus".to_string()),
            ("guid", guid.to_string()),
        ]);
        let response = self.call(request).await?;

        Ok(VerificationStatus::from_result(
            response["result"].as_str().unwrap_or_default(),
        ))
    }

    /// Send a request and parse the json body
    async fn call(&self, request: RequestBuilder) -> Result<JsonValue, ScriptError> {
        let response = request
            .send()
            .await
            .map_err(|e| ScriptError::ContractVerification(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScriptError::ContractVerification(e.to_string()))?;

        if !status.is_success() {
            return Err(ScriptError::ContractVerification(format!(
                "explorer answered {status}: {body}"
            )));
        }

        json::parse(&body).map_err(|e| ScriptError::ContractVerification(e.to_string()))
    }
}

impl ContractVerifier for EtherscanVerifier {
    async fn verify(
        &self,
        contract: CryptoDevsContract,
        address: Address,
        constructor_args: &[Address],
    ) -> Result<(), ScriptError> {
        let name = contract.artifact_name();
        let guid = self.submit(contract, address, constructor_args).await?;
        info!("Submitted {} for verification, guid {}", name, guid);

        for _ in 0..self.max_polls {
            sleep(self.poll_interval).await;

            match self.check_status(&guid).await? {
                VerificationStatus::Pending => continue,
                VerificationStatus::Verified => {
                    info!("Successfully verified {} at {}", name, address);
                    return Ok(());
                }
                VerificationStatus::Failed(reason) => {
                    return Err(ScriptError::ContractVerification(format!(
                        "{name}: {reason}"
                    )));
                }
            }
        }

        Err(ScriptError::ContractVerification(format!(
            "{name}: verification still pending after {} checks",
            self.max_polls
        )))
    }
}

/// Human readable reason from an explorer answer
fn describe(response: &JsonValue) -> String {
    response["result"]
        .as_str()
        .or_else(|| response["message"].as_str())
        .unwrap_or("no reason given")
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::artifacts::tests::write_artifacts;

    const SEPOLIA: u64 = 11155111;

    fn ok(result: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"status":"1","message":"OK","result":"{result}"}}"#
        ))
    }

    fn not_ok(result: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"status":"0","message":"NOTOK","result":"{result}"}}"#
        ))
    }

    fn verifier(server: &MockServer, artifacts: &TempDir) -> EtherscanVerifier {
        EtherscanVerifier::new(
            format!("{}/api", server.uri()),
            "test-key",
            SEPOLIA,
            ArtifactStore::new(artifacts.path()),
        )
        .with_polling(Duration::ZERO, 3)
    }

    fn artifacts() -> TempDir {
        let dir = TempDir::new().unwrap();
        for contract in CryptoDevsContract::ALL {
            write_artifacts(dir.path(), contract.artifact_name(), "0x6080");
        }
        dir
    }

    #[test]
    fn classifies_status_results() {
        assert_eq!(
            VerificationStatus::from_result("Pending in queue"),
            VerificationStatus::Pending
        );
        assert_eq!(
            VerificationStatus::from_result("Pass - Verified"),
            VerificationStatus::Verified
        );
        assert_eq!(
            VerificationStatus::from_result("Already Verified"),
            VerificationStatus::Failed("Already Verified".to_string())
        );
        assert!(matches!(
            VerificationStatus::from_result("Fail - Unable to verify"),
            VerificationStatus::Failed(_)
        ));
    }

    #[tokio::test]
    async fn submits_sources_and_waits_for_pass() {
        let server = MockServer::start().await;
        let artifacts = artifacts();
        let marketplace = Address::repeat_byte(0xBB);
        let nft = Address::repeat_byte(0xAA);

        Mock::given(method("POST"))
            .and(path("/api"))
            .and(query_param("chainid", SEPOLIA.to_string()))
            .and(body_string_contains("action=verifysourcecode"))
            .and(body_string_contains(
                "contractname=contracts%2FCryptoDevsDAO.sol%3ACryptoDevsDAO",
            ))
            .and(body_string_contains("compilerversion=v0.8.19%2Bcommit.7dd6d404"))
            .and(body_string_contains(format!(
                "constructorArguements=000000000000000000000000{}000000000000000000000000{}",
                "bb".repeat(20),
                "aa".repeat(20)
            )))
            .respond_with(ok("guid-dao"))
            .expect(1)
            .mount(&server)
            .await;

        let checks = AtomicU32::new(0);
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("action", "checkverifystatus"))
            .and(query_param("guid", "guid-dao"))
            .respond_with(move |_: &wiremock::Request| {
                if checks.fetch_add(1, Ordering::SeqCst) == 0 {
                    not_ok("Pending in queue")
                } else {
                    ok("Pass - Verified")
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        verifier(&server, &artifacts)
            .verify(
                CryptoDevsContract::Dao,
                Address::repeat_byte(0xCC),
                &[marketplace, nft],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn already_verified_contract_is_an_error() {
        let server = MockServer::start().await;
        let artifacts = artifacts();

        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(not_ok("Contract source code already verified"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ok("Pass - Verified"))
            .expect(0)
            .mount(&server)
            .await;

        let err = verifier(&server, &artifacts)
            .verify(CryptoDevsContract::Nft, Address::repeat_byte(0xAA), &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already verified"));
    }

    #[tokio::test]
    async fn failed_verification_is_an_error() {
        let server = MockServer::start().await;
        let artifacts = artifacts();

        Mock::given(method("POST"))
            .respond_with(ok("guid-nft"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(not_ok("Fail - Unable to verify"))
            .expect(1)
            .mount(&server)
            .await;

        let err = verifier(&server, &artifacts)
            .verify(CryptoDevsContract::Nft, Address::repeat_byte(0xAA), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::ContractVerification(msg) if msg.contains("Unable to verify")));
    }

    #[tokio::test]
    async fn rate_limited_submission_is_an_error() {
        let server = MockServer::start().await;
        let artifacts = artifacts();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Max rate limit reached"))
            .expect(1)
            .mount(&server)
            .await;

        let err = verifier(&server, &artifacts)
            .verify(CryptoDevsContract::Marketplace, Address::repeat_byte(0xBB), &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn gives_up_when_verification_stays_pending() {
        let server = MockServer::start().await;
        let artifacts = artifacts();

        Mock::given(method("POST"))
            .respond_with(ok("guid-slow"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(not_ok("Pending in queue"))
            .expect(3)
            .mount(&server)
            .await;

        let err = verifier(&server, &artifacts)
            .verify(CryptoDevsContract::Nft, Address::repeat_byte(0xAA), &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("still pending"));
    }
}
