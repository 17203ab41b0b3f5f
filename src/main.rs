#[rocket::launch]
fn rocket() -> _ {
    wedding_reply::rocket()
}
