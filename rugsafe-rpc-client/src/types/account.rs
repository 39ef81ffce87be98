//! Account-related types

use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::common::RpcResponse;
use rugsafe_base::Pubkey;

/// Account information as returned by getAccountInfo with base64 encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The balance of the account in lamports
    pub lamports: u64,
    /// The data of the account, decoded from `[data, "base64"]`
    #[serde(
        deserialize_with = "deserialize_account_data",
        serialize_with = "serialize_account_data"
    )]
    pub data: Vec<u8>,
    /// The owner of the account
    pub owner: Pubkey,
    /// Whether the account holds a program
    pub executable: bool,
    /// The epoch at which rent is next due
    pub rent_epoch: u64,
    /// The data size of the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<u64>,
}

/// Decode the `[payload, encoding]` pair; only base64 is requested by this client
fn deserialize_account_data<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let (payload, encoding) = <(String, String)>::deserialize(deserializer)?;
    if encoding != "base64" {
        return Err(serde::de::Error::custom(format!(
            "unsupported account data encoding '{}'",
            encoding
        )));
    }
    base64::engine::general_purpose::STANDARD
        .decode(&payload)
        .map_err(serde::de::Error::custom)
}

fn serialize_account_data<S>(data: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    (encoded, "base64").serialize(serializer)
}

/// Response wrapper for account info; `value` is null for missing accounts
pub type AccountInfoResponse = RpcResponse<Option<Account>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    #[test]
    fn test_account_deserialization() {
        let account_json = r#"{
            "context": {"slot": 341197053, "apiVersion": "2.0.15"},
            "value": {
                "data": ["SGVsbG8gV29ybGQ=", "base64"],
                "executable": false,
                "lamports": 1000000,
                "owner": "FobNvbQsK5BAniZC2oJhXakjcPiArpsthTGDnX9eHDVY",
                "rentEpoch": 18446744073709551615,
                "space": 11
            }
        }"#;

        let response: AccountInfoResponse = serde_json::from_str(account_json).unwrap();
        assert_eq!(response.context.slot, 341197053);
        let account = response.value.unwrap();
        assert_eq!(account.lamports, 1000000);
        assert_eq!(account.data, b"Hello World".to_vec());
        assert_eq!(account.rent_epoch, u64::MAX);
        assert_eq!(account.space, Some(11));
    }

    #[test]
    fn test_missing_account() {
        let json = r#"{"context": {"slot": 1}, "value": null}"#;
        let response: AccountInfoResponse = serde_json::from_str(json).unwrap();
        assert!(response.value.is_none());
    }

    #[test]
    fn test_rejects_other_encodings() {
        let json = r#"{
            "data": ["abc", "base58"],
            "executable": false,
            "lamports": 1,
            "owner": "11111111111111111111111111111111",
            "rentEpoch": 0
        }"#;
        assert!(serde_json::from_str::<Account>(json).is_err());
    }

    #[test]
    fn test_account_serialization() {
        let account = Account {
            lamports: 5,
            data: vec![1, 2, 3],
            owner: Pubkey::default(),
            executable: false,
            rent_epoch: 0,
            space: None,
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["data"], serde_json::json!(["AQID", "base64"]));
        assert_eq!(json["rentEpoch"], 0);
        assert!(json.get("space").is_none());
    }
}
