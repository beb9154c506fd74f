// @generated
/// A sign-up lead. Empty string fields are treated as absent; timestamps are
/// RFC 3339 strings owned by the document store.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignUpLead {
    #[prost(string, tag = "1")]
    pub sign_up_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub cellphone: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub email: ::prost::alloc::string::String,
    #[prost(enumeration = "ValidationChannel", tag = "4")]
    pub validation_channel: i32,
    #[prost(string, tag = "5")]
    pub created_at: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub updated_at: ::prost::alloc::string::String,
    #[prost(string, tag = "7")]
    pub signed_up_at: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignUpLeadRequest {
    #[prost(message, optional, tag = "1")]
    pub sign_up_lead: ::core::option::Option<SignUpLead>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignUpResponse {
    #[prost(string, tag = "1")]
    pub sign_up_id: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValidateSignUpRequest {
    #[prost(string, tag = "1")]
    pub sign_up_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub validation_code: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValidateSignUpResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
}
/// Operation timestamps reported by the worker tier on successful validation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OperationsDates {
    #[prost(string, tag = "1")]
    pub created_at: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub updated_at: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub signed_up_at: ::prost::alloc::string::String,
}
/// Validation channel a lead chose for confirming the sign-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ValidationChannel {
    Unspecified = 0,
    Email = 1,
    Cellphone = 2,
}
impl ValidationChannel {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            ValidationChannel::Unspecified => "VALIDATION_CHANNEL_UNSPECIFIED",
            ValidationChannel::Email => "VALIDATION_CHANNEL_EMAIL",
            ValidationChannel::Cellphone => "VALIDATION_CHANNEL_CELLPHONE",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "VALIDATION_CHANNEL_UNSPECIFIED" => Some(Self::Unspecified),
            "VALIDATION_CHANNEL_EMAIL" => Some(Self::Email),
            "VALIDATION_CHANNEL_CELLPHONE" => Some(Self::Cellphone),
            _ => None,
        }
    }
}
