//! Localised error messages.
//!
//! Handlers always produce English messages. When the server runs with the Arabic
//! locale, [`localize_errors`] swaps the message of every error response using
//! the [`ErrorKind`] that [`ApiError`](super::ApiError) attaches to it.

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::str::FromStr;
use std::sync::Arc;

use super::{AppState, ErrorBody, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Arabic,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::English),
            "ar" => Ok(Self::Arabic),
            other => Err(format!("Unsupported locale '{other}'")),
        }
    }
}

#[must_use]
pub const fn arabic_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::MissingFields => "جميع الحقول مطلوبة",
        ErrorKind::Validation => "البيانات المدخلة غير صالحة",
        ErrorKind::EmailTaken => "البريد الإلكتروني مستخدم بالفعل",
        ErrorKind::AdminExists => "يوجد مسؤول بالفعل",
        ErrorKind::InvalidCredentials => "بيانات الدخول غير صحيحة",
        ErrorKind::NoToken => "لا يوجد رمز دخول",
        ErrorKind::InvalidToken => "رمز الدخول غير صالح أو منتهي الصلاحية",
        ErrorKind::Forbidden => "غير مصرح لك بتنفيذ هذا الإجراء",
        ErrorKind::NotFound => "العنصر غير موجود",
        ErrorKind::Internal => "حدث خطأ داخلي",
    }
}

pub async fn localize_errors(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if state.locale == Locale::English {
        return response;
    }

    let Some(kind) = response.extensions().get::<ErrorKind>().copied() else {
        return response;
    };

    let body = ErrorBody::new(arabic_message(kind), kind.code());
    let mut localized = (response.status(), Json(body)).into_response();
    localized.extensions_mut().insert(kind);
    localized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::English));
        assert_eq!("ar".parse::<Locale>(), Ok(Locale::Arabic));
        assert!("de".parse::<Locale>().is_err());
    }
}
