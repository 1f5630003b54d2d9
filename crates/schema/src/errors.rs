use crate::{error_message, DsResult, ErrorCode, ErrorDetails, ErrorInfo};

impl ErrorInfo {
    pub fn enhance(self, message: impl Into<String>) -> ErrorInfo {
        let mut e = self;
        e.message = format!("{} {} ", e.message, message.into());
        e
    }
    pub fn with_detail(&mut self, k: impl Into<String>, v: impl Into<String>) {
        self.details.push(ErrorDetails {
            detail_name: k.into(),
            detail: v.into(),
        });
    }
    pub fn with_code(&mut self, v: ErrorCode) {
        self.code = v;
    }
}

pub trait EnhanceErrorInfo<T> {
    fn add(self, message: impl Into<String>) -> DsResult<T>;
    fn with_code(self, v: ErrorCode) -> DsResult<T>;
    fn with_detail(self, k: impl Into<String>, v: impl Into<String>) -> DsResult<T>;
}

impl<T> EnhanceErrorInfo<T> for DsResult<T> {
    fn add(self, message: impl Into<String>) -> DsResult<T> {
        self.map_err(|e| e.enhance(message))
    }
    fn with_code(self, v: ErrorCode) -> DsResult<T> {
        self.map_err(|mut e| {
            e.with_code(v);
            e
        })
    }
    fn with_detail(self, k: impl Into<String>, v: impl Into<String>) -> DsResult<T> {
        self.map_err(|mut e| {
            e.with_detail(k, v);
            e
        })
    }
}

pub trait ToErrorInfo {
    fn to_error<T>(&self) -> DsResult<T>;
    fn to_error_code<T>(&self, code: ErrorCode) -> DsResult<T>;
}

impl ToErrorInfo for String {
    fn to_error<T>(&self) -> DsResult<T> {
        Err(crate::error_info(self))
    }
    fn to_error_code<T>(&self, code: ErrorCode) -> DsResult<T> {
        Err(error_message(code, self))
    }
}

impl ToErrorInfo for &str {
    fn to_error<T>(&self) -> DsResult<T> {
        Err::<T, ErrorInfo>(crate::error_info(self.to_string()))
    }
    fn to_error_code<T>(&self, code: ErrorCode) -> DsResult<T> {
        Err(error_message(code, self.to_string()))
    }
}
