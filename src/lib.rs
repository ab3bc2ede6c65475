pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod app_store_server_notification_datasource;
        pub(crate) mod in_memory_subscription_status_store;
        pub(crate) mod jws_decoder;
        pub(crate) mod jws_validator;
    }
    pub(crate) mod models {
        pub(crate) mod app_store_server_api {
            pub(crate) mod common;
            pub(crate) mod jws_renewal_info_decoded_payload_model;
            pub(crate) mod jws_transaction_decoded_payload_model;
        }
        pub(crate) mod app_store_server_notifications {
            pub(crate) mod response_body_v2_decoded_payload_model;
            pub(crate) mod response_body_v2_model;
        }
        pub(crate) mod client_notifications {
            pub(crate) mod client_notification_model;
        }
        pub(crate) mod jws {
            pub(crate) mod jws_header_model;
        }
    }
    pub(crate) mod repositories {
        pub(crate) mod entitlement_repository_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod renewal_info;
        pub mod subscription_status;
        pub mod transaction;
    }
    pub mod repositories {
        pub mod entitlement_repository;
        pub mod subscription_status_store;
    }
    pub mod resolvers {
        pub mod entitlement_resolver;
    }
}

pub mod config;
pub(crate) mod constants;
pub mod errors;
pub mod util;

#[cfg(test)]
mod test_support;

pub use data::datasources::in_memory_subscription_status_store::InMemorySubscriptionStatusStore;
