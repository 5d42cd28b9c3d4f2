use minesweeper as ms;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn create_game(height: u8, width: u8, mines: u16) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let config = ms::GameConfig {
        height: height as usize,
        width: width as usize,
        mines: mines as usize,
        seed: None,
    };
    let session = ms::Session::new(&config, &mut rand::rng()).map_err(|e| e.to_string())?;
    session.serialize().map_err(|e| e.to_string())
}

/// Lets the agent play one move. Returns the updated state.
#[wasm_bindgen]
pub fn step(bts: Vec<u8>) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut session = ms::Session::deserialize(&bts).map_err(|e| e.to_string())?;
    session.step(&mut rand::rng()).map_err(|e| e.to_string())?;
    session.serialize().map_err(|e| e.to_string())
}

/// 0 = playing, 1 = won, 2 = lost, 3 = stuck.
#[wasm_bindgen]
pub fn status(bts: Vec<u8>) -> Result<u8, String> {
    console_error_panic_hook::set_once();

    let session = ms::Session::deserialize(&bts).map_err(|e| e.to_string())?;
    Ok(match session.status() {
        ms::GameStatus::Playing => 0,
        ms::GameStatus::Won => 1,
        ms::GameStatus::Lost => 2,
        ms::GameStatus::Stuck => 3,
    })
}

#[wasm_bindgen]
pub fn get_cells(bts: Vec<u8>) -> Result<Vec<i8>, String> {
    console_error_panic_hook::set_once();

    let session = ms::Session::deserialize(&bts).map_err(|e| e.to_string())?;
    Ok(session.view())
}
