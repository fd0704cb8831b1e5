pub mod customer;
pub mod discount;
pub mod error;
pub mod payment;
pub mod payment_method;
pub mod preference;
pub mod search;
pub mod site;
pub mod tracking;

pub use customer::{Card, Customer};
pub use discount::Discount;
pub use error::{ApiException, Cause};
pub use payment::{MerchantPayment, Payment, PaymentBody, PaymentStatus, TransactionDetails};
pub use payment_method::{
    EntityType, FinancialInstitution, Issuer, PayerCost, PaymentMethod, Token, payment_types,
};
pub use preference::{CheckoutPreference, Identification, Item, Payer, PaymentPreference};
pub use search::{CustomSearchItem, PaymentMethodSearch, PaymentMethodSearchItem};
pub use site::Site;
pub use tracking::{AppInformation, DeviceInfo, Event, EventTrackIntent, TrackingIntent};
