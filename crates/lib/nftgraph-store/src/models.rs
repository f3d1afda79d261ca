use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::schema::UPSERT_OWNERSHIP;

/// Token contract standard reported by the data API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContractType {
    /// Unique token; a wallet owns at most one unit.
    Erc721,
    /// Fungible-multi token; a wallet may own many units.
    Erc1155,
    Other(String),
}

impl ContractType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Erc721 => "ERC721",
            Self::Erc1155 => "ERC1155",
            Self::Other(value) => value,
        }
    }

    #[must_use]
    pub const fn is_fungible(&self) -> bool {
        matches!(self, Self::Erc1155)
    }
}

impl From<String> for ContractType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "ERC721" => Self::Erc721,
            "ERC1155" => Self::Erc1155,
            _ => Self::Other(value),
        }
    }
}

impl From<ContractType> for String {
    fn from(value: ContractType) -> Self {
        match value {
            ContractType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token metadata document (name/image/attributes).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NftMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single NFT item as returned by the data API.
///
/// Fields the model does not name are kept in `extra` so a record serializes
/// back to the shape the API produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NftRecord {
    pub token_address: String,
    pub token_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    /// Raw metadata; the API sends either a JSON-encoded string or an object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Normalized metadata as sent; decoded on demand by [`NftRecord::normalized`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NftRecord {
    /// Decodes the raw `metadata` field.
    ///
    /// Returns `None` when metadata is absent or cannot be decoded.
    #[must_use]
    pub fn parsed_metadata(&self) -> Option<NftMetadata> {
        decode_metadata(self.metadata.as_ref()?)
    }

    /// Decodes `normalized_metadata`.
    ///
    /// Returns `None` when it is absent or cannot be decoded.
    #[must_use]
    pub fn normalized(&self) -> Option<NftMetadata> {
        decode_metadata(self.normalized_metadata.as_ref()?)
    }

    /// Amount owned, interpreted by contract standard.
    ///
    /// Unique tokens always count as one unit.
    #[must_use]
    pub fn owned_amount(&self) -> String {
        match self.contract_type {
            Some(ContractType::Erc721) => "1".to_string(),
            _ => self
                .amount
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or("1")
                .to_string(),
        }
    }

    /// Best display name for the item.
    #[must_use]
    pub fn display_name(&self) -> String {
        [
            self.normalized().and_then(|metadata| metadata.name),
            self.parsed_metadata().and_then(|metadata| metadata.name),
            self.name.clone(),
        ]
        .into_iter()
        .flatten()
        .find(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("#{}", self.token_id))
    }
}

fn decode_metadata(value: &Value) -> Option<NftMetadata> {
    match value {
        Value::String(encoded) => serde_json::from_str(encoded).ok(),
        Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}

/// Result envelope for list endpoints.
///
/// Serializes back to exactly the body the API sent. The decoded view only
/// holds items that match [`NftRecord`]; items that do not are counted by
/// [`NftPage::undecoded`] and still present in the raw body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct NftPage {
    raw: Value,
    status: Option<String>,
    cursor: Option<String>,
    records: Vec<NftRecord>,
    undecoded: usize,
}

impl NftPage {
    /// Builds a page from a raw API body.
    ///
    /// # Errors
    /// Returns an error if the body is not an object or `result` is present
    /// but not an array.
    pub fn from_raw(raw: Value) -> Result<Self, String> {
        let Value::Object(body) = &raw else {
            return Err("NFT page must be a JSON object".to_string());
        };
        let items = match body.get("result") {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => return Err("NFT page `result` must be an array".to_string()),
        };
        let records: Vec<NftRecord> = items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect();
        let undecoded = items.len() - records.len();
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
        Ok(Self {
            status: text("status"),
            cursor: text("cursor"),
            records,
            undecoded,
            raw,
        })
    }

    /// Items decoded from `result`.
    #[must_use]
    pub fn records(&self) -> &[NftRecord] {
        &self.records
    }

    /// Number of `result` items that did not decode as an NFT record.
    #[must_use]
    pub const fn undecoded(&self) -> usize {
        self.undecoded
    }

    /// Number of items in `result`, decoded or not.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len() + self.undecoded
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Cursor for the next page, if the API reported one.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|cursor| !cursor.is_empty())
    }

    /// The body exactly as the API sent it.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }
}

impl Default for NftPage {
    fn default() -> Self {
        Self {
            raw: serde_json::json!({ "result": [] }),
            status: None,
            cursor: None,
            records: Vec::new(),
            undecoded: 0,
        }
    }
}

impl TryFrom<Value> for NftPage {
    type Error = String;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<NftPage> for Value {
    fn from(page: NftPage) -> Self {
        page.raw
    }
}

/// Single NFT with `token_id` and `name` always present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedNft {
    pub token_address: String,
    pub token_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NftMetadata>,
}

impl From<NftRecord> for NormalizedNft {
    fn from(record: NftRecord) -> Self {
        let name = record.display_name();
        let metadata = record.normalized().or_else(|| record.parsed_metadata());
        Self {
            token_address: record.token_address,
            token_id: record.token_id,
            name,
            symbol: record.symbol,
            contract_type: record.contract_type,
            token_uri: record.token_uri,
            owner_of: record.owner_of,
            amount: record.amount,
            metadata,
        }
    }
}

/// Parameterized graph statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphStatement {
    pub query: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl GraphStatement {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Map::new(),
        }
    }

    #[must_use]
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }
}

/// Write statistics reported by the graph store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteStats {
    pub nodes_created: usize,
    pub relationships_created: usize,
    pub properties_set: usize,
    pub labels_added: usize,
}

impl WriteStats {
    pub const fn merge(&mut self, other: Self) {
        self.nodes_created += other.nodes_created;
        self.relationships_created += other.relationships_created;
        self.properties_set += other.properties_set;
        self.labels_added += other.labels_added;
    }
}

/// Ownership of one NFT by one wallet, ready to be written to the graph.
///
/// `(contract_address, token_id)` is the NFT key; `wallet` is the address key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnershipUpsert {
    pub contract_address: String,
    pub token_id: String,
    pub wallet: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<String>,
}

impl OwnershipUpsert {
    /// Maps an API record owned by `wallet` into an upsert.
    #[must_use]
    pub fn from_record(record: &NftRecord, wallet: &str) -> Self {
        Self {
            contract_address: normalize_address(&record.token_address),
            token_id: record.token_id.trim().to_string(),
            wallet: normalize_address(wallet),
            amount: record.owned_amount(),
            name: record.name.clone(),
            symbol: record.symbol.clone(),
            contract_type: record
                .contract_type
                .as_ref()
                .map(|contract_type| contract_type.as_str().to_string()),
            token_uri: record.token_uri.clone(),
            synced_at: None,
        }
    }

    #[must_use]
    pub fn with_synced_at(mut self, synced_at: impl Into<String>) -> Self {
        self.synced_at = Some(synced_at.into());
        self
    }

    /// Builds the ownership upsert statement with its parameters.
    #[must_use]
    pub fn statement(&self) -> GraphStatement {
        GraphStatement::new(UPSERT_OWNERSHIP)
            .bind("contract_address", self.contract_address.clone())
            .bind("token_id", self.token_id.clone())
            .bind("name", self.name.clone())
            .bind("symbol", self.symbol.clone())
            .bind("contract_type", self.contract_type.clone())
            .bind("token_uri", self.token_uri.clone())
            .bind("wallet", self.wallet.clone())
            .bind("amount", self.amount.clone())
            .bind("synced_at", self.synced_at.clone())
    }
}

/// NFT node as stored in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NftNode {
    pub contract_address: String,
    pub token_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
}

/// An NFT held by a wallet, read back from the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnedNft {
    pub contract_address: String,
    pub token_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    pub amount: String,
}

/// A wallet holding an NFT, read back from the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NftOwner {
    pub wallet: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<String>,
}

/// Lowercases and trims an address so graph keys stay case-insensitive.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bored_ape() -> NftRecord {
        serde_json::from_value(json!({
            "token_address": "0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d",
            "token_id": "1234",
            "name": "Bored Ape #1234",
            "symbol": "BAYC",
            "token_uri": "https://ipfs.io/ipfs/...",
            "metadata": {
                "name": "Bored Ape #1234",
                "image": "https://ipfs.io/ipfs/...",
                "attributes": []
            },
            "amount": "1",
            "contract_type": "ERC721"
        }))
        .expect("record should decode")
    }

    #[test]
    fn metadata_decodes_from_encoded_string() {
        let mut record = bored_ape();
        record.metadata = Some(Value::String(
            r#"{"name":"Bored Ape #1234","image":"ipfs://img","attributes":[{"trait_type":"Fur"}]}"#
                .to_string(),
        ));
        let metadata = record.parsed_metadata().expect("metadata should decode");
        assert_eq!(metadata.name.as_deref(), Some("Bored Ape #1234"));
        assert_eq!(metadata.image.as_deref(), Some("ipfs://img"));
        assert_eq!(metadata.attributes.len(), 1);
    }

    #[test]
    fn undecodable_metadata_is_treated_as_missing() {
        let mut record = bored_ape();
        record.metadata = Some(Value::String("not json".to_string()));
        assert!(record.parsed_metadata().is_none());
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let value = json!({
            "token_address": "0x1",
            "token_id": "7",
            "block_number_minted": "12345",
            "possible_spam": false
        });
        let record: NftRecord = serde_json::from_value(value.clone()).expect("record should decode");
        assert_eq!(serde_json::to_value(&record).expect("record should encode"), value);
    }

    #[test]
    fn contract_type_keeps_unrecognized_standards() {
        let erc: ContractType = "erc1155".to_string().into();
        assert_eq!(erc, ContractType::Erc1155);
        assert!(erc.is_fungible());
        let other: ContractType = "CRYPTOPUNKS".to_string().into();
        assert_eq!(String::from(other), "CRYPTOPUNKS");
    }

    #[test]
    fn unique_tokens_always_own_one_unit() {
        let mut record = bored_ape();
        record.amount = Some("3".to_string());
        assert_eq!(record.owned_amount(), "1");
        record.contract_type = Some(ContractType::Erc1155);
        assert_eq!(record.owned_amount(), "3");
        record.amount = None;
        assert_eq!(record.owned_amount(), "1");
    }

    #[test]
    fn ownership_statement_binds_keys() {
        let upsert = OwnershipUpsert::from_record(&bored_ape(), "0xTEST");
        let statement = upsert.statement();
        assert_eq!(statement.query, UPSERT_OWNERSHIP);
        assert_eq!(
            statement.param("contract_address"),
            Some(&json!("0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d"))
        );
        assert_eq!(statement.param("token_id"), Some(&json!("1234")));
        assert_eq!(statement.param("wallet"), Some(&json!("0xtest")));
        assert_eq!(statement.param("amount"), Some(&json!("1")));
        assert_eq!(statement.param("synced_at"), Some(&Value::Null));
    }

    #[test]
    fn page_serializes_to_the_body_it_was_read_from() {
        let raw = json!({
            "status": "SYNCED",
            "cursor": null,
            "page_size": 100,
            "result": [
                {
                    "token_address": "0x76be3b62873462d2142405439777e971754e8e77",
                    "token_id": "10207",
                    "contract_type": "erc1155",
                    "metadata": null,
                    "token_uri": null,
                    "amount": "3"
                }
            ]
        });
        let page: NftPage = serde_json::from_value(raw.clone()).expect("page should decode");

        assert_eq!(page.records()[0].contract_type, Some(ContractType::Erc1155));
        assert_eq!(page.next_cursor(), None);
        assert_eq!(page.status(), Some("SYNCED"));
        assert_eq!(serde_json::to_value(&page).expect("page should encode"), raw);
    }

    #[test]
    fn malformed_items_do_not_fail_the_page() {
        let raw = json!({
            "result": [
                {
                    "token_address": "0x1",
                    "token_id": "1",
                    "name": "Named",
                    "normalized_metadata": { "name": null, "attributes": null }
                },
                { "token_address": "0x1", "token_id": 2 }
            ]
        });
        let page: NftPage = serde_json::from_value(raw.clone()).expect("page should decode");

        assert_eq!(page.records().len(), 1);
        assert_eq!(page.undecoded(), 1);
        assert_eq!(page.len(), 2);
        let metadata = page.records()[0].normalized().expect("metadata should decode");
        assert!(metadata.attributes.is_empty());
        assert_eq!(page.records()[0].display_name(), "Named");
        assert_eq!(serde_json::to_value(&page).expect("page should encode"), raw);
    }

    #[test]
    fn non_object_pages_are_rejected() {
        assert!(serde_json::from_value::<NftPage>(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<NftPage>(json!({ "result": "nope" })).is_err());
        let empty: NftPage = serde_json::from_value(json!({})).expect("page should decode");
        assert!(empty.is_empty());
    }

    #[test]
    fn blank_names_fall_through_to_the_next_candidate() {
        let mut record = bored_ape();
        record.normalized_metadata = Some(json!({ "name": "" }));
        record.metadata = Some(json!({ "name": "  " }));
        assert_eq!(record.display_name(), "Bored Ape #1234");

        record.metadata = Some(json!({ "name": "From metadata" }));
        assert_eq!(record.display_name(), "From metadata");

        record.normalized_metadata = Some(json!({ "name": "Normalized" }));
        assert_eq!(record.display_name(), "Normalized");
    }

    #[test]
    fn normalized_nft_falls_back_to_token_id() {
        let record: NftRecord = serde_json::from_value(json!({
            "token_address": "0x1",
            "token_id": "99"
        }))
        .expect("record should decode");
        let normalized = NormalizedNft::from(record);
        assert_eq!(normalized.token_id, "99");
        assert_eq!(normalized.name, "#99");
    }
}
