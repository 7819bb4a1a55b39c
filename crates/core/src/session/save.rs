//! End-of-session save stage.

use tracing::warn;

use crate::dataset::{
    reconcile, DatasetError, DatasetStore, ListMerge, ReconcileChoices, SaveMode, SearchConfig,
};

use super::console::{ask_choice, ask_yes_no, AmendSave, Console, ReviewedSave};
use super::render::format_list;
use super::{Session, SessionError};

const AMEND_SAVE_MENU: &str = "Would you like to:\n\
- Overwrite your data set with the new one: (o)\n\
- Save as a new data set: (s)\n\
- View changes with options to combine, revert, or overwrite: (v)\n\
- Exit without saving: (e)\n";

const REVIEWED_SAVE_MENU: &str = "Would you like to:\n\
- Overwrite the current data set: (o)\n\
- Save as a new data set: (s)\n\
- Make no changes: (m)\n";

impl<C: Console> Session<C> {
    pub(super) fn save_fresh(&mut self, config: &SearchConfig) -> Result<(), SessionError> {
        if !ask_yes_no(
            &mut self.console,
            "Would you like to save this URL, usernames, and search terms for later use? (y/n): ",
        )? {
            self.console.say("Ok! Have a great day. Exiting program.");
            return Ok(());
        }

        let name = self.save_as_new(config)?;
        self.console
            .say(&format!("Your data set has been saved as {name}.\nHave a great day!"));
        Ok(())
    }

    pub(super) fn save_amended(
        &mut self,
        name: &str,
        saved: &SearchConfig,
        current: &SearchConfig,
    ) -> Result<(), SessionError> {
        loop {
            match ask_choice::<AmendSave>(&mut self.console, AMEND_SAVE_MENU)? {
                AmendSave::Overwrite => {
                    if self.overwrite(name, current)? {
                        return Ok(());
                    }
                }
                AmendSave::SaveNew => {
                    let new_name = self.save_as_new(current)?;
                    self.console
                        .say(&format!("Your data set has been saved as {new_name}.\nHave a great day!"));
                    return Ok(());
                }
                AmendSave::ViewChanges => {
                    let merged = self.review_changes(saved, current)?;
                    return self.save_reviewed(name, &merged);
                }
                AmendSave::Exit => {
                    self.console
                        .say("Exiting the program without saving.\nHave a great day!");
                    return Ok(());
                }
            }
        }
    }

    fn save_reviewed(&mut self, name: &str, merged: &SearchConfig) -> Result<(), SessionError> {
        loop {
            match ask_choice::<ReviewedSave>(&mut self.console, REVIEWED_SAVE_MENU)? {
                ReviewedSave::Overwrite => {
                    if self.overwrite(name, merged)? {
                        return Ok(());
                    }
                }
                ReviewedSave::SaveNew => {
                    let new_name = self.save_as_new(merged)?;
                    self.console
                        .say(&format!("Your data set has been saved as {new_name}.\nHave a great day!"));
                    return Ok(());
                }
                ReviewedSave::NoChanges => {
                    self.console
                        .say("Nothing has been changed.\nHave a great day!");
                    return Ok(());
                }
            }
        }
    }

    /// Ask for names until one is free, then save there.
    fn save_as_new(&mut self, config: &SearchConfig) -> Result<String, SessionError> {
        loop {
            let name = DatasetStore::dataset_name(
                &self
                    .console
                    .ask("Please input a name for this collection: ")?,
            );
            if name.is_empty() || name.contains(['/', '\\']) {
                self.console.say("Please input a valid name.\n");
                continue;
            }

            match self.store.save(&name, config, SaveMode::NewFile) {
                Ok(_) => return Ok(name),
                Err(DatasetError::Conflict(_)) => self.console.say(&format!(
                    "A data set named {name} already exists. Please choose a different name.\n"
                )),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Overwrite `name`. A permission problem is reported and `false`
    /// returned so the user can pick another option.
    fn overwrite(&mut self, name: &str, config: &SearchConfig) -> Result<bool, SessionError> {
        match self.store.save(name, config, SaveMode::Overwrite) {
            Ok(_) => {
                self.console
                    .say(&format!("Data set {name} has been updated.\nHave a great day!"));
                Ok(true)
            }
            Err(e @ DatasetError::PermissionDenied(_)) => {
                warn!(dataset = %name, error = %e, "Overwrite refused");
                self.console
                    .say(&format!("{e}. Please choose another option.\n"));
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Walk through what changed and build the dataset the user settles on.
    fn review_changes(
        &mut self,
        saved: &SearchConfig,
        current: &SearchConfig,
    ) -> Result<SearchConfig, SessionError> {
        let take_current_url = if saved.proxy_base_url == current.proxy_base_url {
            self.console.say("\nYou did not change the URL.");
            false
        } else {
            self.console.say(&format!(
                "\nYou changed the URL.\nOld: {}\nNew: {}",
                saved.proxy_base_url, current.proxy_base_url
            ));
            ask_yes_no(
                &mut self.console,
                "Would you like to overwrite the old URL? (y/n): ",
            )?
        };

        let usernames = self.review_list("usernames", &saved.usernames, &current.usernames)?;
        let search_terms =
            self.review_list("search terms", &saved.search_terms, &current.search_terms)?;

        let merged = reconcile(
            saved,
            current,
            ReconcileChoices {
                take_current_url,
                usernames,
                search_terms,
            },
        );
        self.console.say(&format!(
            "\nResulting data set:\nURL: {}\nUsernames: {}\nSearch terms: {}\n",
            merged.proxy_base_url,
            format_list(&merged.usernames),
            format_list(&merged.search_terms)
        ));
        Ok(merged)
    }

    fn review_list(
        &mut self,
        label: &str,
        saved: &[String],
        current: &[String],
    ) -> Result<ListMerge, SessionError> {
        if saved == current {
            self.console.say(&format!("You did not change the {label}."));
            return Ok(ListMerge::Keep);
        }

        self.console.say(&format!(
            "\nThe {label} have been changed.\nOld: {}\nNew: {}",
            format_list(saved),
            format_list(current)
        ));
        ask_choice(
            &mut self.console,
            &format!(
                "Would you like to:\n\
                 - Keep the original {label}: (k)\n\
                 - Overwrite with the new {label}: (o)\n\
                 - Combine all {label} (skipping duplicates): (c)\n"
            ),
        )
    }
}
