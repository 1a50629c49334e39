use thiserror::Error;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
}

#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("GameParams root is not an object")]
    InvalidGameParamsData,
    #[error("Missing field `{field}` on `{node}`")]
    MissingField { node: String, field: String },
    #[error("Field `{field}` on `{node}` is not a {expected}")]
    UnexpectedFieldType {
        node: String,
        field: String,
        expected: &'static str,
    },
    #[error("Unknown module type `{0}`")]
    UnknownModuleType(String),
    #[error("Unknown projectile type `{0}`")]
    UnknownProjectileType(String),
    #[error("Unknown aircraft type `{0}`")]
    UnknownAircraftType(String),
    #[error("Air defense aura `{0}` matches no range bucket")]
    UnknownAuraBucket(String),
    #[error("Module `{0}` has no top-level cost entry")]
    ModuleCostNotFound(String),
    #[error("Pinger sector list has {0} entries, expected exactly 2")]
    PingerSectorCount(usize),
    #[error("Aura `{0}` has zero damage but is not a bubble")]
    ZeroDamageAura(String),
    #[error("No ships found in the game params")]
    NoShips,
    #[error("Language table for locale `{0}` was not loaded")]
    MissingLocale(String),
    #[error("Error serializing or deserializing json: {err}")]
    SerdeJson {
        #[from]
        err: serde_json::Error,
    },
    #[error("IO error")]
    IoError(#[from] std::io::Error),
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

impl std::convert::From<serde_json::Error> for Error {
    fn from(x: serde_json::Error) -> Error {
        Error { kind: x.into() }
    }
}

impl std::convert::From<std::io::Error> for Error {
    fn from(x: std::io::Error) -> Error {
        Error { kind: x.into() }
    }
}

pub type IResult<T> = Result<T, Error>;

pub fn failure_from_kind(kind: ErrorKind) -> Error {
    Error { kind }
}
