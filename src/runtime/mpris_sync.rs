use crate::app::App;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    mpris.set_playback(app.playback);
    mpris.set_title(app.now_playing.as_ref().map(|np| np.label.clone()));
}
