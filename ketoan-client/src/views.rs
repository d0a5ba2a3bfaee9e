//! Admin list views
//!
//! One [`ListView`] per admin table. Owner-scoped views carry the business
//! owner's id and list that owner's records.

use shared::models::{
    AdminAccountant, AdminBusinessOwner, AdminInvoiceIn, AdminOutputInvoice, AdminProduct,
    AdminStorageItem, AdminUser,
};
use shared::query::{FilterDimension, SortKey};

use crate::list::ListView;

/// Declares a sort-field enum and its wire names.
macro_rules! sort_fields {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl SortKey for $name {
            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }
    };
}

sort_fields!(
    /// Business owner list sort fields
    OwnerSort {
        CreatedAt => "createdAt",
        BusinessName => "businessName",
        EmployeeCount => "employeeCount",
    }
);

sort_fields!(
    /// Invoice sort fields: issue date, total payable, seller name
    InvoiceSort {
        IssuedAt => "tdlap",
        TotalPayable => "tgtttbso",
        SellerName => "nbten",
    }
);

sort_fields!(
    StorageSort {
        CreatedAt => "createdAt",
        Name => "name",
        Quantity => "quantity",
        Price => "price",
    }
);

sort_fields!(
    ProductSort {
        CreatedAt => "createdAt",
        Name => "name",
        Price => "price",
        Stock => "stock",
    }
);

sort_fields!(
    AccountantSort {
        CreatedAt => "createdAt",
    }
);

sort_fields!(
    /// User list sort fields. Users carry `createdDate`, not `createdAt`.
    UserSort {
        CreatedDate => "createdDate",
        Name => "name",
        Email => "email",
    }
);

const OWNERS_PATH: &str = "/admin/business-owners";

fn owner_path(owner_id: &str, collection: &str) -> String {
    format!("{OWNERS_PATH}/{owner_id}/{collection}")
}

/// All household businesses
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessOwnersView;

impl ListView for BusinessOwnersView {
    type Row = AdminBusinessOwner;
    type Sort = OwnerSort;

    fn path(&self) -> String {
        OWNERS_PATH.to_string()
    }

    fn filters(&self) -> &'static [FilterDimension] {
        &[FilterDimension::Status]
    }

    fn default_sort(&self) -> OwnerSort {
        OwnerSort::CreatedAt
    }
}

/// Purchase invoices of one business owner
#[derive(Debug, Clone)]
pub struct InvoicesInView {
    pub owner_id: String,
}

impl InvoicesInView {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }
}

impl ListView for InvoicesInView {
    type Row = AdminInvoiceIn;
    type Sort = InvoiceSort;

    fn path(&self) -> String {
        owner_path(&self.owner_id, "invoices-in")
    }

    fn filters(&self) -> &'static [FilterDimension] {
        &[FilterDimension::Status]
    }

    fn default_sort(&self) -> InvoiceSort {
        InvoiceSort::IssuedAt
    }
}

/// Sales invoices of one business owner
#[derive(Debug, Clone)]
pub struct OutputInvoicesView {
    pub owner_id: String,
}

impl OutputInvoicesView {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }
}

impl ListView for OutputInvoicesView {
    type Row = AdminOutputInvoice;
    type Sort = InvoiceSort;

    fn path(&self) -> String {
        owner_path(&self.owner_id, "output-invoices")
    }

    fn filters(&self) -> &'static [FilterDimension] {
        &[FilterDimension::Status]
    }

    fn default_sort(&self) -> InvoiceSort {
        InvoiceSort::IssuedAt
    }
}

/// Inventory of one business owner
#[derive(Debug, Clone)]
pub struct StorageItemsView {
    pub owner_id: String,
}

impl StorageItemsView {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }
}

impl ListView for StorageItemsView {
    type Row = AdminStorageItem;
    type Sort = StorageSort;

    fn path(&self) -> String {
        owner_path(&self.owner_id, "storage-items")
    }

    fn filters(&self) -> &'static [FilterDimension] {
        &[FilterDimension::Category]
    }

    fn default_sort(&self) -> StorageSort {
        StorageSort::CreatedAt
    }
}

/// Products sold by one business owner
#[derive(Debug, Clone)]
pub struct ProductsView {
    pub owner_id: String,
}

impl ProductsView {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }
}

impl ListView for ProductsView {
    type Row = AdminProduct;
    type Sort = ProductSort;

    fn path(&self) -> String {
        owner_path(&self.owner_id, "products")
    }

    fn filters(&self) -> &'static [FilterDimension] {
        &[FilterDimension::Category, FilterDimension::IsActive]
    }

    fn default_sort(&self) -> ProductSort {
        ProductSort::CreatedAt
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccountantsView;

impl ListView for AccountantsView {
    type Row = AdminAccountant;
    type Sort = AccountantSort;

    fn path(&self) -> String {
        "/admin/accountants".to_string()
    }

    fn default_sort(&self) -> AccountantSort {
        AccountantSort::CreatedAt
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UsersView;

impl ListView for UsersView {
    type Row = AdminUser;
    type Sort = UserSort;

    fn path(&self) -> String {
        "/admin/users".to_string()
    }

    fn default_sort(&self) -> UserSort {
        UserSort::CreatedDate
    }
}
