//! A `bank` service whose command-line client is generated at build time.

pub mod bank {
    /// The only message of the `bank` package.
    #[derive(Clone, Copy, PartialEq, ::prost::Message, ::serde::Serialize, ::serde::Deserialize)]
    #[serde(default)]
    pub struct Amount {
        #[prost(int64, tag = "1")]
        pub units: i64,
    }

    include!(concat!(env!("OUT_DIR"), "/bank.Bank.rs"));
    include!(concat!(env!("OUT_DIR"), "/bank.cli.rs"));
}
