use crate::notestore::BoxedNoteStore;
use crate::NoteDraft;

pub async fn populate_test_data(store: &BoxedNoteStore) {
    store
        .new_note(NoteDraft::new(
            "Swim with wild dolphins".to_owned(),
            "Somewhere warm. Kaikoura maybe?".to_owned(),
        ))
        .await
        .unwrap();
    store
        .new_note(NoteDraft::new(
            "Learn to make fresh pasta".to_owned(),
            "Take the class first, then cook for friends.".to_owned(),
        ))
        .await
        .unwrap();
    store
        .new_note(NoteDraft::new(
            "See the northern lights".to_owned(),
            "Tromso or Iceland, late winter.".to_owned(),
        ))
        .await
        .unwrap();
}
