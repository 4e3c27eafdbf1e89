//! Client Mirror
//!
//! 参加者ごとに動く、サーバー状態のローカルな複製（権威を持たない）。
//!
//! - サーバーで確定した状態を `strokeId → Stroke` で保持し、表示順を別に持つ
//! - 自分が描いている最中のストロークは往復を待たずに描画する
//! - `stroke-assigned` が届くまでの点と終了は溜めておき、届いた時点で順番に送信する
//!   （`start-stroke` の token で対応付け、応答のないまま追い越された開始は拒否されたものとして捨てる）
//! - undo で取り消されたストロークも点列を保持し、redo で再描画できるようにする
//!   （undo 後に参加した場合は保持していないため、次の全体同期まで描画できない）

use std::collections::{HashMap, VecDeque};

use sketchroom_shared::protocol::{
    ClientMessage, Point, ServerMessage, StrokeData, Tool, UserData,
};

use crate::render::Renderer;

/// 複製されたストローク
#[derive(Debug, Clone, PartialEq)]
pub struct MirroredStroke {
    /// サーバーが割り当てた ID（割り当て前の自分のストロークは token と同じ `local-<n>`）
    pub id: String,
    pub owner_id: String,
    /// 所有者の表示色（`stroke-started` で受け取った場合のみ）
    pub owner_color: Option<String>,
    pub tool: Tool,
    pub color: String,
    pub line_width: f64,
    pub points: Vec<Point>,
    pub finalized: bool,
}

impl From<StrokeData> for MirroredStroke {
    fn from(data: StrokeData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            owner_color: None,
            tool: data.tool,
            color: data.color,
            line_width: data.line_width,
            points: data.points,
            finalized: data.finalized,
        }
    }
}

/// 自分が次に描くストロークの設定
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub tool: Tool,
    pub color: String,
    pub line_width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            color: "#000000".to_string(),
            line_width: 5.0,
        }
    }
}

/// 他の参加者のカーソル
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCursor {
    pub user: UserData,
    pub position: Point,
}

/// 描画中の自分のストローク
#[derive(Debug, Clone, PartialEq)]
enum LocalDrawing {
    /// ID の割り当て待ち（`unassigned` の末尾）
    Unassigned,
    Assigned(String),
}

pub struct ClientMirror<R: Renderer> {
    renderer: R,
    strokes: HashMap<String, MirroredStroke>,
    visible: Vec<String>,
    unassigned: VecDeque<MirroredStroke>,
    drawing: Option<LocalDrawing>,
    next_local_label: u64,
    me: Option<UserData>,
    users: Vec<UserData>,
    cursors: HashMap<String, RemoteCursor>,
    style: StrokeStyle,
}

impl<R: Renderer> ClientMirror<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            strokes: HashMap::new(),
            visible: Vec::new(),
            unassigned: VecDeque::new(),
            drawing: None,
            next_local_label: 0,
            me: None,
            users: Vec::new(),
            cursors: HashMap::new(),
            style: StrokeStyle::default(),
        }
    }

    // ========================================
    // Server → Mirror
    // ========================================

    /// サーバーからのメッセージを反映する
    ///
    /// 割り当て待ちだった自分のストロークの点・終了など、
    /// 続けて送信すべきメッセージを返す。
    pub fn apply(&mut self, message: ServerMessage) -> Vec<ClientMessage> {
        match message {
            ServerMessage::InitialState {
                strokes,
                user,
                users,
            } => {
                self.load(strokes);
                self.me = Some(user);
                self.users = users;
            }
            ServerMessage::PeerJoined { user } => {
                tracing::debug!("peer joined: {}", user.name);
            }
            ServerMessage::UsersChanged { users } => self.set_users(users),
            ServerMessage::PeerLeft { user_id, users } => {
                self.cursors.remove(&user_id);
                self.set_users(users);
            }
            ServerMessage::StrokeStarted {
                id,
                owner_id,
                owner_color,
                tool,
                color,
                line_width,
                points,
            } => {
                if self.strokes.contains_key(&id) {
                    tracing::debug!("stroke {} already mirrored", id);
                    return Vec::new();
                }
                let stroke = MirroredStroke {
                    id: id.clone(),
                    owner_id,
                    owner_color: Some(owner_color),
                    tool,
                    color,
                    line_width,
                    points,
                    finalized: false,
                };
                self.renderer.draw_stroke(&stroke);
                self.visible.push(id.clone());
                self.strokes.insert(id, stroke);
            }
            ServerMessage::StrokeAssigned { stroke_id, token } => {
                return self.assign(stroke_id, token);
            }
            ServerMessage::StrokeExtended { stroke_id, point } => {
                let is_visible = self.visible.contains(&stroke_id);
                if let Some(stroke) = self.strokes.get_mut(&stroke_id)
                    && !stroke.finalized
                {
                    let from = stroke.points.last().copied();
                    stroke.points.push(point);
                    if let Some(from) = from
                        && is_visible
                    {
                        self.renderer.draw_segment(stroke, from, point);
                    }
                }
            }
            ServerMessage::StrokeFinalized { stroke_id } => {
                if let Some(stroke) = self.strokes.get_mut(&stroke_id) {
                    stroke.finalized = true;
                }
            }
            ServerMessage::CursorMoved {
                user_id,
                user,
                position,
            } => {
                self.cursors
                    .insert(user_id, RemoteCursor { user, position });
            }
            ServerMessage::StrokeUndone { stroke_id } => {
                self.visible.retain(|id| id != &stroke_id);
                self.repaint();
            }
            ServerMessage::StrokeRedone { stroke_id } => match self.strokes.get_mut(&stroke_id) {
                Some(stroke) => {
                    stroke.finalized = true;
                    self.visible.retain(|id| id != &stroke_id);
                    self.visible.push(stroke_id);
                    self.renderer.draw_stroke(stroke);
                }
                None => {
                    tracing::debug!("stroke {} was redone but is not retained", stroke_id);
                }
            },
            ServerMessage::CanvasCleared => {
                self.strokes.clear();
                self.visible.clear();
                if matches!(self.drawing, Some(LocalDrawing::Assigned(_))) {
                    self.drawing = None;
                }
                self.repaint();
            }
        }
        Vec::new()
    }

    // ========================================
    // Local input → Mirror
    // ========================================

    /// 自分のストロークを開始（描画中のストロークがあれば先に終了する）
    pub fn begin_local_stroke(&mut self, point: Point) -> Vec<ClientMessage> {
        let mut messages = self.end_local_stroke();

        let stroke = MirroredStroke {
            id: format!("local-{}", self.next_local_label),
            owner_id: self.me.as_ref().map(|u| u.id.clone()).unwrap_or_default(),
            owner_color: self.me.as_ref().map(|u| u.color.clone()),
            tool: self.style.tool,
            color: self.style.color.clone(),
            line_width: self.style.line_width,
            points: vec![point],
            finalized: false,
        };
        self.next_local_label += 1;
        let token = stroke.id.clone();
        self.renderer.draw_stroke(&stroke);
        self.unassigned.push_back(stroke);
        self.drawing = Some(LocalDrawing::Unassigned);

        messages.push(ClientMessage::StartStroke {
            tool: self.style.tool,
            color: self.style.color.clone(),
            line_width: self.style.line_width,
            point,
            token: Some(token),
        });
        messages
    }

    /// 描画中の自分のストロークに点を追加
    pub fn extend_local_stroke(&mut self, point: Point) -> Vec<ClientMessage> {
        match &self.drawing {
            None => Vec::new(),
            Some(LocalDrawing::Unassigned) => {
                if let Some(stroke) = self.unassigned.back_mut() {
                    Self::push_local_point(&mut self.renderer, stroke, point);
                }
                Vec::new()
            }
            Some(LocalDrawing::Assigned(id)) => {
                let Some(stroke) = self.strokes.get_mut(id) else {
                    return Vec::new();
                };
                Self::push_local_point(&mut self.renderer, stroke, point);
                vec![ClientMessage::MoveStroke {
                    stroke_id: id.clone(),
                    point,
                }]
            }
        }
    }

    /// 描画中の自分のストロークを終了
    pub fn end_local_stroke(&mut self) -> Vec<ClientMessage> {
        match self.drawing.take() {
            None => Vec::new(),
            Some(LocalDrawing::Unassigned) => {
                if let Some(stroke) = self.unassigned.back_mut() {
                    stroke.finalized = true;
                }
                Vec::new()
            }
            Some(LocalDrawing::Assigned(id)) => {
                if let Some(stroke) = self.strokes.get_mut(&id) {
                    stroke.finalized = true;
                }
                vec![ClientMessage::EndStroke { stroke_id: id }]
            }
        }
    }

    /// 描画面のサイズが変わった（全体を描き直す）
    pub fn resize(&mut self) {
        self.repaint();
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.style.tool = tool;
    }

    pub fn set_color(&mut self, color: String) {
        self.style.color = color;
    }

    pub fn set_line_width(&mut self, line_width: f64) {
        self.style.line_width = line_width;
    }

    // ========================================
    // Queries
    // ========================================

    /// 表示中のストローク（表示順）
    pub fn visible_strokes(&self) -> Vec<&MirroredStroke> {
        self.visible
            .iter()
            .filter_map(|id| self.strokes.get(id))
            .collect()
    }

    /// 保持しているストローク（取り消し済みも含む）
    pub fn stroke(&self, stroke_id: &str) -> Option<&MirroredStroke> {
        self.strokes.get(stroke_id)
    }

    pub fn me(&self) -> Option<&UserData> {
        self.me.as_ref()
    }

    pub fn users(&self) -> &[UserData] {
        &self.users
    }

    pub fn cursors(&self) -> &HashMap<String, RemoteCursor> {
        &self.cursors
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    /// ID の割り当てを待っている自分のストロークの数
    pub fn awaiting_assignment(&self) -> usize {
        self.unassigned.len()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    // ========================================
    // Internals
    // ========================================

    fn load(&mut self, strokes: Vec<StrokeData>) {
        self.strokes.clear();
        self.visible.clear();
        self.unassigned.clear();
        self.drawing = None;
        self.cursors.clear();
        for data in strokes {
            self.visible.push(data.id.clone());
            self.strokes.insert(data.id.clone(), data.into());
        }
        self.repaint();
    }

    fn set_users(&mut self, users: Vec<UserData>) {
        if let Some(me) = &mut self.me
            && let Some(updated) = users.iter().find(|u| u.id == me.id)
        {
            *me = updated.clone();
        }
        self.users = users;
    }

    /// 割り当て待ちのストロークに ID を結び付け、溜めていた点と終了を返す
    ///
    /// サーバーは 1 接続のメッセージを順番に処理するため、対応する開始より前に
    /// 応答のなかった開始は拒否されている。それらは捨てて描き直す。
    fn assign(&mut self, stroke_id: String, token: Option<String>) -> Vec<ClientMessage> {
        let position = match &token {
            Some(token) => self.unassigned.iter().position(|s| &s.id == token),
            None => (!self.unassigned.is_empty()).then_some(0),
        };
        let Some(position) = position else {
            tracing::warn!(
                "stroke {} was assigned to {:?} but nothing matching is awaiting",
                stroke_id,
                token
            );
            return Vec::new();
        };

        let rejected: Vec<MirroredStroke> = self.unassigned.drain(..position).collect();
        for stroke in &rejected {
            tracing::warn!("stroke {} was not accepted by the server", stroke.id);
        }
        let Some(mut stroke) = self.unassigned.pop_front() else {
            return Vec::new();
        };
        stroke.id = stroke_id.clone();

        let mut messages: Vec<ClientMessage> = stroke
            .points
            .iter()
            .skip(1)
            .map(|&point| ClientMessage::MoveStroke {
                stroke_id: stroke_id.clone(),
                point,
            })
            .collect();
        if stroke.finalized {
            messages.push(ClientMessage::EndStroke {
                stroke_id: stroke_id.clone(),
            });
        } else if self.unassigned.is_empty()
            && matches!(self.drawing, Some(LocalDrawing::Unassigned))
        {
            self.drawing = Some(LocalDrawing::Assigned(stroke_id.clone()));
        }

        self.visible.push(stroke_id.clone());
        self.strokes.insert(stroke_id, stroke);
        if !rejected.is_empty() {
            self.repaint();
        }
        messages
    }

    fn push_local_point(renderer: &mut R, stroke: &mut MirroredStroke, point: Point) {
        let from = stroke.points.last().copied();
        stroke.points.push(point);
        if let Some(from) = from {
            renderer.draw_segment(stroke, from, point);
        }
    }

    /// 表示中の確定済みストロークと、自分の描きかけのストロークを描き直す
    fn repaint(&mut self) {
        self.renderer.clear_surface();
        for id in &self.visible {
            if let Some(stroke) = self.strokes.get(id)
                && stroke.finalized
            {
                self.renderer.draw_stroke(stroke);
            }
        }
        for stroke in &self.unassigned {
            self.renderer.draw_stroke(stroke);
        }
        if let Some(LocalDrawing::Assigned(id)) = &self.drawing
            && self.visible.contains(id)
            && let Some(stroke) = self.strokes.get(id)
        {
            self.renderer.draw_stroke(stroke);
        }
    }
}
