//! End-to-end checks of the core services running on the `SQLite` adapter.

use std::sync::Arc;

use savaeat_core::{
    CoreError, GeoPoint, RatingAggregate, RegisterRequest, ResolvedRole, Role, UserProfile,
};
use savaeat_db::TestDb;

fn vendor_request(name: &str, email: &str, lat: f64, lng: f64) -> RegisterRequest {
    RegisterRequest {
        role: Role::Vendor,
        name: name.to_string(),
        email: email.to_string(),
        password: "secret1".to_string(),
        profile_image_url: "https://img.test/p.png".to_string(),
        banner_image_url: "https://img.test/b.png".to_string(),
        description: Some("Garba, attiéké".to_string()),
        shop_name: Some(name.to_string()),
        address: Some("Bè, Lomé".to_string()),
        phone_number: Some("+228 90 00 00 00".to_string()),
        latitude: Some(lat),
        longitude: Some(lng),
    }
}

fn client_request(name: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        role: Role::Client,
        name: name.to_string(),
        email: email.to_string(),
        password: "secret1".to_string(),
        profile_image_url: "https://img.test/c.png".to_string(),
        banner_image_url: "https://img.test/cb.png".to_string(),
        description: None,
        shop_name: None,
        address: None,
        phone_number: None,
        latitude: None,
        longitude: None,
    }
}

#[tokio::test]
async fn registration_session_and_identity() {
    let db = TestDb::new().await.unwrap();
    let core = db.app_core();

    let user = core
        .accounts()
        .register(&vendor_request("Mama Afi", "afi@savaeat.test", 6.1850, 1.3520))
        .await
        .unwrap();
    assert_eq!(user.role, ResolvedRole::Vendor);

    let session = core
        .accounts()
        .sign_in("afi@savaeat.test", "secret1")
        .await
        .unwrap();
    let current = core
        .identity()
        .current_user(&session.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.principal_id, user.principal_id);
    assert!(matches!(current.profile, Some(UserProfile::Vendor(ref v)) if v.name == "Mama Afi"));

    core.accounts().sign_out(&session.token).await.unwrap();
    assert!(
        core.identity()
            .current_user(&session.token)
            .await
            .unwrap()
            .is_none()
    );

    let err = core
        .accounts()
        .register(&client_request("Afi again", "AFI@savaeat.test"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));
}

#[tokio::test]
async fn reviews_keep_the_aggregate_in_step() {
    let db = TestDb::new().await.unwrap();
    let core = db.app_core();

    let vendor = core
        .accounts()
        .register(&vendor_request("Mama Afi", "afi@savaeat.test", 6.1850, 1.3520))
        .await
        .unwrap();
    let client = core
        .accounts()
        .register(&client_request("Kossi", "kossi@savaeat.test"))
        .await
        .unwrap();
    let vendor_id = vendor.principal_id.as_str();
    let client_id = client.principal_id.as_str();

    let first = core
        .ratings()
        .add_review(vendor_id, client_id, "Kossi", 4, "Bon")
        .await
        .unwrap();
    core.ratings()
        .add_review(vendor_id, client_id, "Kossi", 2, "Moyen")
        .await
        .unwrap();
    assert_eq!(
        core.profiles().fetch_vendor(vendor_id).await.unwrap().aggregate(),
        RatingAggregate::new(3.0, 2)
    );

    core.ratings()
        .update_review(&first.id, vendor_id, 5, "Excellent")
        .await
        .unwrap();
    core.ratings()
        .delete_review(&first.id, vendor_id)
        .await
        .unwrap();
    assert_eq!(
        core.profiles().fetch_vendor(vendor_id).await.unwrap().aggregate(),
        RatingAggregate::new(2.0, 1)
    );

    let listed = core.reviews().reviews_for_vendor(vendor_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].author.as_ref().unwrap().name, "Kossi");

    assert_eq!(
        core.ratings().recompute_aggregate(vendor_id).await.unwrap(),
        RatingAggregate::new(2.0, 1)
    );
}

#[tokio::test]
async fn likes_directory_and_repair() {
    let db = TestDb::new().await.unwrap();
    let core = Arc::new(db.app_core());

    let near = core
        .accounts()
        .register(&vendor_request("Maquis du Coin", "coin@savaeat.test", 6.1850, 1.3520))
        .await
        .unwrap();
    core.accounts()
        .register(&vendor_request("Chez Loin", "loin@savaeat.test", 6.4, 1.6))
        .await
        .unwrap();
    let client = core
        .accounts()
        .register(&client_request("Kossi", "kossi@savaeat.test"))
        .await
        .unwrap();

    let nearby = core
        .directory()
        .find_vendors(GeoPoint::new(6.1870, 1.3540), 5.0, "maquis")
        .await
        .unwrap();
    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0].vendor.id, near.principal_id);

    let outcome = core
        .likes()
        .toggle_like(&near.principal_id, &client.principal_id, Role::Client)
        .await
        .unwrap();
    assert!(outcome.liked);

    let favorites = core
        .likes()
        .favorites(&client.principal_id, Role::Client, "")
        .await
        .unwrap();
    assert_eq!(favorites.len(), 1);

    // Break one side behind the core's back, then repair.
    sqlx::query("DELETE FROM favorite_vendors WHERE owner_id = ?")
        .bind(&client.principal_id)
        .execute(db.pool())
        .await
        .unwrap();
    let report = core.likes().repair_likes().await.unwrap();
    assert_eq!(report.favorites_added, 1);

    let client_doc = core
        .profiles()
        .fetch_client(&client.principal_id)
        .await
        .unwrap();
    assert!(client_doc.favorite_vendors.contains(&near.principal_id));
}
