pub use self::{
    client::NuportClient,
    reader::NubitReader,
    verifier::verify_square,
    writer::{NubitWriter, NUBIT_WRITER_NAME},
};

mod client;
mod reader;
mod verifier;
mod writer;
