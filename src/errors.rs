//////////////////////////////////////////////////////////////////////
// use error chain so we can use Result<> everywhere
// for error handling

error_chain!{

    foreign_links {
        Fmt(::std::fmt::Error);
        Io(::std::io::Error);
        ParseInt(::std::num::ParseIntError);
        ParseFloat(::std::num::ParseFloatError);
    }

    errors {

        // recoverable: bad coordinate state, non-bijective permutation, ...
        Validation(msg: String) {
            description("validation failure")
            display("validation failure: {}", msg)
        }

        // division by zero or numerical breakdown
        Domain(msg: String) {
            description("arithmetic domain error")
            display("arithmetic domain error: {}", msg)
        }

        // structural input that can never produce a tiling
        Config(msg: String) {
            description("configuration error")
            display("configuration error: {}", msg)
        }

        ResourceExhausted(limit: usize) {
            description("resource limit exceeded")
            display("resource limit exceeded: more than {} elements generated", limit)
        }

    }

}

// shorthand constructors used throughout the crate

pub fn validation<S: Into<String>>(msg: S) -> Error {
    let msg = msg.into();
    tracing::warn!("{}", msg);
    ErrorKind::Validation(msg).into()
}

pub fn domain<S: Into<String>>(msg: S) -> Error {
    ErrorKind::Domain(msg.into()).into()
}

pub fn config<S: Into<String>>(msg: S) -> Error {
    ErrorKind::Config(msg.into()).into()
}
