pub mod otp;

pub use otp::{
    RequestCodeRequest, RequestCodeResponse, StatusQuery, VerifyCodeRequest, VerifyCodeResponse,
};
