//! Payment Signature Verification
//!
//! 网关回传的签名为 HMAC-SHA256(secret, "{order_id}|{payment_id}") 的
//! 十六进制表示。验证走 `ring::hmac::verify`，比较是常数时间的。

use ring::hmac;

/// 计算签名负载对应的 HMAC-SHA256 十六进制签名
pub fn compute_signature(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let payload = signature_payload(gateway_order_id, gateway_payment_id);
    let tag = hmac::sign(&key, payload.as_bytes());
    hex::encode(tag.as_ref())
}

/// 验证网关回传的签名
///
/// 非十六进制或长度不符的 claimed 签名直接判为无效。
pub fn verify_signature(
    secret: &str,
    gateway_order_id: &str,
    gateway_payment_id: &str,
    claimed: &str,
) -> bool {
    let Ok(claimed_bytes) = hex::decode(claimed) else {
        return false;
    };

    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let payload = signature_payload(gateway_order_id, gateway_payment_id);
    hmac::verify(&key, payload.as_bytes(), &claimed_bytes).is_ok()
}

fn signature_payload(gateway_order_id: &str, gateway_payment_id: &str) -> String {
    format!("{}|{}", gateway_order_id, gateway_payment_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_key_secret";

    #[test]
    fn test_roundtrip_signature_verifies() {
        let sig = compute_signature(SECRET, "order_abc", "pay_def");
        assert!(verify_signature(SECRET, "order_abc", "pay_def", &sig));
    }

    #[test]
    fn test_single_byte_mutation_rejected() {
        let mut sig = compute_signature(SECRET, "order_abc", "pay_def");
        // Flip the last hex digit
        let last = sig.pop().unwrap();
        sig.push(if last == '0' { '1' } else { '0' });
        assert!(!verify_signature(SECRET, "order_abc", "pay_def", &sig));
    }

    #[test]
    fn test_wrong_ids_rejected() {
        let sig = compute_signature(SECRET, "order_abc", "pay_def");
        assert!(!verify_signature(SECRET, "order_abc", "pay_other", &sig));
        assert!(!verify_signature(SECRET, "order_other", "pay_def", &sig));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let sig = compute_signature(SECRET, "order_abc", "pay_def");
        assert!(!verify_signature("other_secret", "order_abc", "pay_def", &sig));
    }

    #[test]
    fn test_non_hex_claim_rejected() {
        assert!(!verify_signature(SECRET, "order_abc", "pay_def", "zz-not-hex"));
        assert!(!verify_signature(SECRET, "order_abc", "pay_def", ""));
    }
}
