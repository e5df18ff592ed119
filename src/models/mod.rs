mod franchise;
mod menu;
mod order;
pub mod price;
mod session;
mod user;

pub use franchise::{
    CreateFranchise, Franchise, FranchiseAdmin, FranchisePage, FranchiseQuery, FranchiseView,
    NewFranchise, NewStore, Store, StoreSummary,
};
pub use menu::{MenuItem, NewMenuItem};
pub use order::{
    DinerOrder, NewDinerOrder, NewOrderItem, Order, OrderItem, OrderItemRow, OrderLine, OrderPage,
    OrderReceipt, OrderRequest, Verification, VerificationTicket,
};
pub use session::NewAuthSession;
pub use user::{NewUser, NewUserRole, Role, RoleAssignment, UpdateUser, User, UserProfile, UserRole};
