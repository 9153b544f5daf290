//! Assets offered for purchase, keyed by their CoinGecko id.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub name: &'static str,
    pub id: &'static str,
}

const fn asset(name: &'static str, id: &'static str) -> Asset {
    Asset { name, id }
}

pub const ASSETS: &[Asset] = &[
    asset("0x", "0x"),
    asset("Ampleforth", "ampleforth"),
    asset("Ankr", "ankr"),
    asset("Apollo", "apollo-currency"),
    asset("Bancor Network Token", "bancor"),
    asset("Binance Coin", "binancecoin"),
    asset("Bitcoin", "bitcoin"),
    asset("Bitcoin-Cash", "bitcoin-cash"),
    asset("Cardano", "cardano"),
    asset("Chainlink", "chainlink"),
    asset("Dash", "dash"),
    asset("Ethereum", "ethereum"),
    asset("Tether", "tether"),
    asset("Polkadot", "polkadot"),
    asset("Uniswap", "uniswap"),
    asset("Litecoin", "litecoin"),
    asset("Internet-Computer", "internet-computer"),
    asset("EOS", "eos"),
    asset("The-Graph", "the-graph"),
    asset("Maker", "maker"),
    asset("Numeraire", "numeraire"),
    asset("Decentraland", "decentraland"),
    asset("Sushi", "sushi"),
    asset("Filecoin", "filecoin"),
];

/// Assets whose display name or id contains `query`, ignoring case.
pub fn search_assets(query: &str) -> Vec<Asset> {
    let needle = query.to_lowercase();
    ASSETS
        .iter()
        .filter(|a| a.name.to_lowercase().contains(&needle) || a.id.contains(&needle))
        .copied()
        .collect()
}
