// Job listing web surface: browse, filter, search, detail, and the
// create -> preview -> confirm -> save flow for employers.

pub mod forms;
pub mod handlers;
