//! The CryptoDevs contracts handled by the scripts

use alloy::primitives::Address;

/// One of the three contracts we deploy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptoDevsContract {
    /// The CryptoDevs NFT collection
    Nft,
    /// The fake NFT marketplace used by the DAO to buy NFTs
    Marketplace,
    /// The DAO, depending on both the marketplace and the NFT
    Dao,
}

impl CryptoDevsContract {
    /// All the contracts, in deployment order
    pub const ALL: [CryptoDevsContract; 3] = [
        CryptoDevsContract::Nft,
        CryptoDevsContract::Marketplace,
        CryptoDevsContract::Dao,
    ];

    /// Name of the contract in the hardhat artifacts
    pub fn artifact_name(&self) -> &'static str {
        match self {
            CryptoDevsContract::Nft => "CryptoDevsNFT",
            CryptoDevsContract::Marketplace => "FakeNFTMarketplace",
            CryptoDevsContract::Dao => "CryptoDevsDAO",
        }
    }

    /// Key of the contract in the deployment record
    pub fn output_key(&self) -> &'static str {
        match self {
            CryptoDevsContract::Nft => "nft",
            CryptoDevsContract::Marketplace => "marketplace",
            CryptoDevsContract::Dao => "dao",
        }
    }
}

/// Constructor arguments of the DAO, the marketplace first and the NFT second
pub fn dao_constructor_args(marketplace: Address, nft: Address) -> Vec<Address> {
    vec![marketplace, nft]
}

/// A contract confirmed on chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// Which contract it is
    pub contract: CryptoDevsContract,
    /// Address it was deployed at
    pub address: Address,
    /// Constructor arguments used for the deployment, needed again for verification
    pub constructor_args: Vec<Address>,
}

/// The three deployed contracts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedSuite {
    /// The NFT collection
    pub nft: DeployedContract,
    /// The marketplace
    pub marketplace: DeployedContract,
    /// The DAO, holding the two others as constructor args
    pub dao: DeployedContract,
}

impl DeployedSuite {
    /// Rebuild a suite from known addresses, deriving the DAO constructor args
    pub fn from_addresses(nft: Address, marketplace: Address, dao: Address) -> Self {
        DeployedSuite {
            nft: DeployedContract {
                contract: CryptoDevsContract::Nft,
                address: nft,
                constructor_args: vec![],
            },
            marketplace: DeployedContract {
                contract: CryptoDevsContract::Marketplace,
                address: marketplace,
                constructor_args: vec![],
            },
            dao: DeployedContract {
                contract: CryptoDevsContract::Dao,
                address: dao,
                constructor_args: dao_constructor_args(marketplace, nft),
            },
        }
    }

    /// The contracts in verification order
    pub fn contracts(&self) -> [&DeployedContract; 3] {
        [&self.nft, &self.marketplace, &self.dao]
    }
}
