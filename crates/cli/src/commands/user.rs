//! Profile commands.

use cloudmart_core::UserProfile;
use cloudmart_storefront::state::Storefront;

use super::Result;

/// Fields to change; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl ProfileChanges {
    /// Merge the changes into `profile`.
    fn apply(self, mut profile: UserProfile) -> UserProfile {
        if let Some(email) = self.email {
            profile.email = email;
        }
        if let Some(first_name) = self.first_name {
            profile.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            profile.last_name = last_name;
        }
        if let Some(phone) = self.phone {
            profile.phone = phone;
        }
        profile
    }
}

pub fn show(storefront: &Storefront) -> Result {
    match storefront.user().current()? {
        Some(profile) => print_profile(&profile),
        None => println!("No profile stored."),
    }
    Ok(())
}

/// Merge `changes` into the stored profile and write it back whole.
pub fn update(storefront: &Storefront, changes: ProfileChanges) -> Result {
    let current = storefront.user().current()?.unwrap_or_default();
    let updated = storefront.user().update(changes.apply(current))?;
    print_profile(&updated);
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!("Name:  {}", profile.display_name());
    println!("Email: {}", profile.email);
    if !profile.phone.is_empty() {
        println!("Phone: {}", profile.phone);
    }
}
