//! Attestation payloads, signing and recovery
//!
//! Attestors run `sign` off-ledger; relayers and operators use `payload` and `recover` to check
//! what a signature commits to before submitting it.

use anyhow::{anyhow, Context, Result};

use qbridge_oracle::{
    attestation_digest, build_attestation_payload, recover_attestor, Attestation, AttestorKey,
};

use crate::commands::AttestationArgs;

fn decode_hex(label: &str, value: &str) -> Result<Vec<u8>> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits)
        .with_context(|| format!("{label} is not valid hex"))
}

/// Payload and digest for one attestation
pub fn handle_payload(args: &AttestationArgs) -> Result<String> {
    let prefix = decode_hex("prefix", &args.prefix)?;
    let payload = build_attestation_payload(&prefix, args.kind, &args.submission);
    Ok(format!(
        "payload: 0x{}\ndigest:  0x{}",
        hex::encode(&payload),
        hex::encode(attestation_digest(&payload))
    ))
}

/// Sign an attestation and print it as JSON, ready for a relayer
pub fn handle_sign(args: &AttestationArgs, secret: &str) -> Result<String> {
    let prefix = decode_hex("prefix", &args.prefix)?;
    let key = AttestorKey::from_hex(secret)?;
    let attestation = key.attest(&prefix, args.kind, &args.submission)?;
    tracing::info!(
        attestor = %key.address(),
        submission = %args.submission,
        kind = %args.kind,
        "attestation signed"
    );

    let output = serde_json::json!({
        "attestor": key.address().to_string(),
        "kind": args.kind,
        "submission": args.submission,
        "attestation": attestation,
    });
    serde_json::to_string_pretty(&output)
        .context("failed to render attestation")
}

/// Recover the signer of a relayed attestation
pub fn handle_recover(args: &AttestationArgs, signature: &str) -> Result<String> {
    let prefix = decode_hex("prefix", &args.prefix)?;
    let signature = decode_hex("signature", signature)?;
    let attestation = Attestation::new(prefix, signature);
    let payload = attestation.payload(args.kind, &args.submission);
    recover_attestor(&payload, &attestation.signature)
        .map(|attestor| attestor.to_string())
        .ok_or_else(|| anyhow!("signature does not recover to an attestor"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_core::{AttestationKind, Hash32, SubmissionId};

    const SECRET: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn args(kind: AttestationKind) -> AttestationArgs {
        AttestationArgs {
            kind,
            prefix: "0xf86b".to_string(),
            submission: SubmissionId(Hash32([3u8; 32])),
        }
    }

    #[test]
    fn test_sign_then_recover() {
        let signed = handle_sign(&args(AttestationKind::Mint), SECRET).unwrap();
        let json: serde_json::Value = serde_json::from_str(&signed).unwrap();
        assert_eq!(json["attestor"], "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
        assert_eq!(json["kind"], "mint");

        let signature = json["attestation"]["signature"].as_str().unwrap();
        let mint = args(AttestationKind::Mint);
        let recovered = handle_recover(&mint, signature).unwrap();
        assert_eq!(recovered, "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");

        let other_table = handle_recover(&args(AttestationKind::Burn), signature);
        assert!(other_table.map_or(true, |addr| addr != recovered));
    }

    #[test]
    fn test_payload_output() {
        let output = handle_payload(&args(AttestationKind::Burn)).unwrap();
        assert!(output.starts_with("payload: 0xf86b"));
        assert!(output.contains("8080\n"));
    }

    #[test]
    fn test_bad_hex_is_reported() {
        let mut bad = args(AttestationKind::Mint);
        bad.prefix = "zz".to_string();
        assert!(handle_payload(&bad).is_err());
        let short = handle_recover(&args(AttestationKind::Mint), "0x1234");
        assert!(short.is_err());
    }
}
