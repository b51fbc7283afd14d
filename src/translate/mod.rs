pub mod batch;
pub mod credentials;
pub mod google;
pub mod interface;

pub use batch::TranslationClient;
pub use credentials::ServiceAccountCredentials;
pub use google::GoogleTranslateProvider;
pub use interface::{
    LabelTranslation, TranslationProvider, TranslationRequest, TranslationResponse,
};
