pub const TABLE_NFT: &str = "nft";
pub const TABLE_ADDRESS: &str = "address";

pub const REL_OWNS: &str = "owns";

pub const NODE_TABLES: [&str; 2] = [TABLE_NFT, TABLE_ADDRESS];
pub const EDGE_TABLES: [&str; 1] = [REL_OWNS];

/// Uniqueness constraints backing the graph keys.
pub const DEFINE_SCHEMA: &str = r"
DEFINE INDEX IF NOT EXISTS nft_key ON TABLE nft FIELDS contract_address, token_id UNIQUE;
DEFINE INDEX IF NOT EXISTS address_key ON TABLE address FIELDS address UNIQUE;
DEFINE INDEX IF NOT EXISTS owns_pair ON TABLE owns FIELDS in, out UNIQUE;
";

/// Match-or-create the NFT node, the address node and the `owns` edge.
///
/// The amount lives on the edge. Node record ids are derived from their keys,
/// and the edge is updated in place when the pair is already related. The
/// transaction ends by returning what it created, measured against the records
/// it saw before writing.
pub const UPSERT_OWNERSHIP: &str = r"
BEGIN TRANSACTION;
LET $nft_id = type::thing('nft', [$contract_address, $token_id]);
LET $address_id = type::thing('address', $wallet);
LET $nft_before = SELECT VALUE id FROM $nft_id;
LET $address_before = SELECT VALUE id FROM $address_id;
LET $existing = SELECT VALUE id FROM owns WHERE in = $address_id AND out = $nft_id;
UPSERT $nft_id MERGE {
    contract_address: $contract_address,
    token_id: $token_id,
    name: $name,
    symbol: $symbol,
    contract_type: $contract_type,
    token_uri: $token_uri
};
UPSERT $address_id MERGE { address: $wallet };
IF $existing {
    UPDATE $existing SET amount = $amount, synced_at = $synced_at;
} ELSE {
    RELATE $address_id->owns->$nft_id SET amount = $amount, synced_at = $synced_at;
};
RETURN {
    nodes_created: 2 - array::len($nft_before) - array::len($address_before),
    relationships_created: 1 - array::len($existing)
};
COMMIT TRANSACTION;
";

pub const SELECT_OWNED_NFTS: &str = "SELECT out.contract_address AS contract_address, out.token_id AS token_id, out.name AS name, out.symbol AS symbol, out.contract_type AS contract_type, amount FROM owns WHERE in = type::thing('address', $wallet) LIMIT $limit;";

pub const SELECT_NFT_OWNERS: &str = "SELECT in.address AS wallet, amount, synced_at FROM owns WHERE out = type::thing('nft', [$contract_address, $token_id]) LIMIT $limit;";

pub const SELECT_NFT: &str = "SELECT contract_address, token_id, name, symbol, contract_type, token_uri FROM nft WHERE contract_address = $contract_address AND token_id = $token_id LIMIT 1;";

/// Record count for a table. Yields no rows when the table is empty.
#[must_use]
pub fn count_statement(table: &str) -> String {
    format!("SELECT count() AS total FROM {table} GROUP ALL;")
}
